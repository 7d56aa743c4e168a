use std::ffi::OsString;
use std::path::PathBuf;

use clap::{App, ArgMatches};

use crate::scenes::{Scene, ShaderOverrides};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    Check,
}

/// Everything the command line configures.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub command: Command,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub scene: Scene,
    pub shaders: ShaderOverrides,
    pub log_filter: Option<String>,
}

/// Parses `std::env::args`, exiting with a usage message on bad input.
pub fn cli_main() -> Config {
    parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

pub fn parse_from<I, T>(args: I) -> Result<Config, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let yaml = load_yaml!("cli.yaml");
    let matches = App::from_yaml(yaml).get_matches_from_safe(args)?;
    from_matches(&matches)
}

fn from_matches(matches: &ArgMatches<'_>) -> Result<Config, clap::Error> {
    let command = match matches.subcommand_name() {
        Some("check") => Command::Check,
        _ => Command::Run,
    };

    Ok(Config {
        command,
        width: value_t!(matches, "width", u32)?,
        height: value_t!(matches, "height", u32)?,
        title: matches.value_of("title").unwrap_or("LearnOpenGL").to_string(),
        scene: value_t!(matches, "scene", Scene)?,
        shaders: ShaderOverrides {
            vertex: matches.value_of_os("vertex").map(PathBuf::from),
            fragment: matches.value_of_os("fragment").map(PathBuf::from),
        },
        log_filter: matches.value_of("log").map(String::from),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_open_the_triangle_exercise() {
        let config = parse_from(vec!["glpractice"]).unwrap();

        assert_eq!(
            config,
            Config {
                command: Command::Run,
                width: 800,
                height: 600,
                title: "LearnOpenGL".to_string(),
                scene: Scene::Triangle,
                shaders: ShaderOverrides::default(),
                log_filter: None,
            }
        );
    }

    #[test]
    fn check_subcommand_with_overrides() {
        let config = parse_from(vec![
            "glpractice",
            "--scene",
            "two-triangles",
            "--vertex",
            "assets/shaders/shader.vs",
            "--log",
            "shaders=debug",
            "check",
        ])
        .unwrap();

        assert_eq!(config.command, Command::Check);
        assert_eq!(config.scene, Scene::TwoTriangles);
        assert_eq!(config.shaders.vertex, Some(PathBuf::from("assets/shaders/shader.vs")));
        assert_eq!(config.shaders.fragment, None);
        assert_eq!(config.log_filter.as_deref(), Some("shaders=debug"));
    }

    #[test]
    fn bad_sizes_and_scenes_are_rejected() {
        assert!(parse_from(vec!["glpractice", "--width", "wide"]).is_err());
        assert!(parse_from(vec!["glpractice", "--scene", "cube"]).is_err());
    }
}
