//! Tests for command-line argument parsing
//!
//! Note: These tests verify the argument parser configuration by creating
//! a test parser with the same structure as the main application.

use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};

/// Create a command with the same argument structure as the main binary
fn create_test_command() -> ClapCommand {
    ClapCommand::new("back-curve-detector")
        .version("0.1.0")
        .about("Back curve detection from depth sensor frames")
        .arg(
            Arg::new("config")
                .short('C')
                .long("config")
                .value_name("PATH")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_parser(value_parser!(u64))
                .default_value("30")
                .help("Number of frames to replay"),
        )
        .arg(
            Arg::new("distance")
                .long("distance")
                .value_parser(value_parser!(f64))
                .default_value("2.0")
                .help("Distance of the person from the sensor"),
        )
        .arg(
            Arg::new("noise")
                .long("noise")
                .action(ArgAction::SetTrue)
                .help("Add speckle noise"),
        )
        .arg(
            Arg::new("bodies")
                .short('b')
                .long("bodies")
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Number of tracked bodies"),
        )
        .arg(
            Arg::new("plot")
                .short('p')
                .long("plot")
                .action(ArgAction::SetTrue)
                .help("Print text plots"),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .action(ArgAction::SetTrue)
                .help("Disable sensor tilt correction"),
        )
        .arg(
            Arg::new("dump-config")
                .long("dump-config")
                .action(ArgAction::SetTrue)
                .help("Print the effective configuration"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug output"),
        )
}

#[test]
fn test_help_argument() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["back-curve-detector", "--help"]);

    // Help should cause an error (but a specific help error)
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_no_arguments() {
    let cmd = create_test_command();
    let matches = cmd.try_get_matches_from(vec!["back-curve-detector"]).unwrap();

    // Should succeed with defaults
    assert_eq!(matches.get_one::<u64>("frames"), Some(&30));
    assert_eq!(matches.get_one::<f64>("distance"), Some(&2.0));
    assert_eq!(matches.get_one::<usize>("bodies"), Some(&1));
    assert!(!matches.get_flag("noise"));
    assert!(!matches.get_flag("plot"));
    assert!(matches.get_one::<String>("config").is_none());
}

#[test]
fn test_replay_arguments() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec![
            "back-curve-detector",
            "-n",
            "120",
            "--distance",
            "3.25",
            "--noise",
            "--bodies",
            "2",
            "--plot",
        ])
        .unwrap();

    assert_eq!(matches.get_one::<u64>("frames"), Some(&120));
    assert_eq!(matches.get_one::<f64>("distance"), Some(&3.25));
    assert_eq!(matches.get_one::<usize>("bodies"), Some(&2));
    assert!(matches.get_flag("noise"));
    assert!(matches.get_flag("plot"));
}

#[test]
fn test_config_argument() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec!["back-curve-detector", "-C", "back.yaml", "--dump-config", "--raw"])
        .unwrap();

    assert_eq!(matches.get_one::<String>("config").map(|s| s.as_str()), Some("back.yaml"));
    assert!(matches.get_flag("dump-config"));
    assert!(matches.get_flag("raw"));
}

#[test]
fn test_invalid_numbers() {
    for args in [
        vec!["back-curve-detector", "--frames", "-1"],
        vec!["back-curve-detector", "--frames", "many"],
        vec!["back-curve-detector", "--distance", "far"],
        vec!["back-curve-detector", "--bodies", "1.5"],
    ] {
        let cmd = create_test_command();
        assert!(cmd.try_get_matches_from(args.clone()).is_err(), "Should reject {:?}", args);
    }
}
