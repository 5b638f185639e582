use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::export::BatchPolicy;
use crate::font::FontSpec;
use crate::icon::Softening;
use crate::logger;

const CONFIG_FILE: &str = "calicon.conf";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub generated_dir: PathBuf,
    pub resized_dir: PathBuf,
    pub source_image: PathBuf,
    pub font_path: Option<PathBuf>,
    pub font_family: String,
    pub softening: Softening,
    pub continue_on_error: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generated_dir: PathBuf::from("NewAppIcons"),
            resized_dir: PathBuf::from("FinalAppIcons"),
            source_image: PathBuf::from("source_icon.png"),
            font_path: None,
            font_family: "Helvetica".to_string(),
            softening: Softening::Gradient,
            continue_on_error: false,
            log_file: None,
        }
    }
}

impl Config {
    pub fn font_spec(&self) -> FontSpec {
        FontSpec { path: self.font_path.clone(), family: self.font_family.clone() }
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        if self.continue_on_error { BatchPolicy::ContinueOnError } else { BatchPolicy::FailFast }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub source_image: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
    pub font_family: Option<String>,
    pub softening: Option<Softening>,
    pub continue_on_error: bool,
}

impl Config {
    /// `output_dir` replaces `generated_dir` or `resized_dir` depending on `resizing`.
    pub fn apply(&mut self, o: Overrides, resizing: bool) {
        if let Some(dir) = o.output_dir {
            if resizing { self.resized_dir = dir } else { self.generated_dir = dir }
        }
        if let Some(src) = o.source_image { self.source_image = src; }
        if o.font_path.is_some() { self.font_path = o.font_path; }
        if let Some(family) = o.font_family { self.font_family = family; }
        if let Some(mode) = o.softening { self.softening = mode; }
        self.continue_on_error |= o.continue_on_error;
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "calicon", "calicon").map(|d| d.config_dir().join(CONFIG_FILE))
}

/// Parses `key=value` lines. Unknown keys and unparsable values keep the defaults.
pub fn parse_config(content: &str) -> Config {
    let mut cfg = Config::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else { continue };
        let v = v.trim();
        match k.trim() {
            "generated_dir" if !v.is_empty() => cfg.generated_dir = PathBuf::from(v),
            "resized_dir" if !v.is_empty() => cfg.resized_dir = PathBuf::from(v),
            "source_image" if !v.is_empty() => cfg.source_image = PathBuf::from(v),
            "font_path" => cfg.font_path = (!v.is_empty()).then(|| PathBuf::from(v)),
            "font_family" if !v.is_empty() => cfg.font_family = v.to_string(),
            "softening" => cfg.softening = v.parse().unwrap_or_default(),
            "continue_on_error" => cfg.continue_on_error = v.parse::<u8>().map(|n| n != 0).unwrap_or(false),
            "log_file" => {
                cfg.log_file = match v {
                    "" => None,
                    "auto" => logger::default_log_path(),
                    p => Some(PathBuf::from(p)),
                }
            }
            other => debug!("ignoring config key '{}'", other),
        }
    }
    cfg
}

/// Reads an explicit file, or the per-user config with `./calicon.conf` as fallback.
/// No config file at all is not an error.
pub fn read_config(explicit: Option<&Path>) -> Result<Config, io::Error> {
    if let Some(path) = explicit {
        return fs::read_to_string(path).map(|s| parse_config(&s));
    }
    let candidates = config_file_path().into_iter().chain(std::iter::once(PathBuf::from(CONFIG_FILE)));
    for path in candidates {
        match fs::read_to_string(&path) {
            Ok(s) => return Ok(parse_config(&s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gives_defaults() {
        assert_eq!(parse_config(""), Config::default());
        assert_eq!(Config::default().batch_policy(), BatchPolicy::FailFast);
    }

    #[test]
    fn parses_known_keys() {
        let cfg = parse_config(
            "# icons\n\
             generated_dir = out/gen\n\
             resized_dir=out/final\n\
             source_image=art/source.png\n\
             font_path=/fonts/Inter.ttf\n\
             font_family=Inter\n\
             softening=stacked\n\
             continue_on_error=1\n\
             log_file=/tmp/calicon.log\n\
             colour=red\n",
        );
        assert_eq!(cfg.generated_dir, PathBuf::from("out/gen"));
        assert_eq!(cfg.resized_dir, PathBuf::from("out/final"));
        assert_eq!(cfg.source_image, PathBuf::from("art/source.png"));
        assert_eq!(cfg.font_path, Some(PathBuf::from("/fonts/Inter.ttf")));
        assert_eq!(cfg.font_family, "Inter");
        assert_eq!(cfg.softening, Softening::Stacked);
        assert_eq!(cfg.batch_policy(), BatchPolicy::ContinueOnError);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/calicon.log")));
        assert_eq!(cfg.font_spec().family, "Inter");
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = parse_config("softening=radial\ncontinue_on_error=yes\ngenerated_dir=\nno equals sign\n");
        assert_eq!(cfg.softening, Softening::Gradient);
        assert!(!cfg.continue_on_error);
        assert_eq!(cfg.generated_dir, PathBuf::from("NewAppIcons"));
    }

    #[test]
    fn overrides_win() {
        let mut cfg = parse_config("generated_dir=a\nresized_dir=b\n");
        cfg.apply(
            Overrides {
                output_dir: Some("c".into()),
                font_family: Some("Menlo".into()),
                continue_on_error: true,
                ..Overrides::default()
            },
            true,
        );
        assert_eq!(cfg.generated_dir, PathBuf::from("a"));
        assert_eq!(cfg.resized_dir, PathBuf::from("c"));
        assert_eq!(cfg.font_family, "Menlo");
        assert!(cfg.continue_on_error);
        assert_eq!(cfg.softening, Softening::Gradient);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_config(Some(&dir.path().join("nope.conf"))).is_err());
        let path = dir.path().join("c.conf");
        fs::write(&path, "font_family=Arial\n").unwrap();
        assert_eq!(read_config(Some(&path)).unwrap().font_family, "Arial");
    }
}
