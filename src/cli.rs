//! Command-line flag parsing for the four color slots.
//!
//! Deliberately a plain left-to-right scan: every failure prints a
//! diagnostic plus the usage text (or the palette, for a bad name) and the
//! process exits with status 0. Only a failed display connection later on
//! produces a non-zero exit.

use crate::color::{ColorConfig, ColorError, ColorSlot, Rgb, PALETTE};

#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
    /// Proceed with the given slot configuration.
    Continue(ColorConfig),
    /// Help, palette listing or an argument error; exit with status 0.
    ExitEarly,
}

pub fn print_usage() {
    println!(
        "\nbtry v{} system tray battery monitor\n\
         \n\
         Usage: btry [-h] [-c] [-b COLOR] [-f COLOR] [-B COLOR] [-F COLOR]\n\
         \n\
         \x20 -h --help          print this dialog\n\
         \x20 -c --colors        list the valid color names\n\
         \x20 -b --bg-charge     background color while charging\n\
         \x20 -f --fg-charge     foreground color while charging\n\
         \x20 -B --bg-discharge  background color while discharging\n\
         \x20 -F --fg-discharge  foreground color while discharging\n\
         \n\
         COLOR is 6 hex digits (AED6F1) or a name from --colors.\n",
        env!("CARGO_PKG_VERSION")
    );
}

pub fn print_palette() {
    println!("valid color names:");
    for (name, [r, g, b]) in PALETTE {
        println!("  {name:<10} {r:02X}{g:02X}{b:02X}");
    }
}

/// Scans `args` (program name already stripped) left to right. The cursor
/// advances by 2 over a color flag and its value, by 1 otherwise; the first
/// failure short-circuits the rest.
pub fn parse(args: &[String]) -> ParseOutcome {
    let mut colors = ColorConfig::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let slot = match flag {
            "-h" | "--help" => {
                print_usage();
                return ParseOutcome::ExitEarly;
            }
            "-c" | "--colors" => {
                print_palette();
                return ParseOutcome::ExitEarly;
            }
            "-b" | "--bg-charge" => ColorSlot::BgCharge,
            "-f" | "--fg-charge" => ColorSlot::FgCharge,
            "-B" | "--bg-discharge" => ColorSlot::BgDischarge,
            "-F" | "--fg-discharge" => ColorSlot::FgDischarge,
            other => {
                println!("E: unrecognized flag '{other}'");
                print_usage();
                return ParseOutcome::ExitEarly;
            }
        };

        let Some(spec) = args.get(i + 1) else {
            println!("E: {flag} requires argument [COLOR] -- FFFFFF");
            print_usage();
            return ParseOutcome::ExitEarly;
        };

        match Rgb::resolve(spec) {
            Ok(rgb) => colors.set(slot, rgb),
            Err(err @ ColorError::InvalidFormat(_)) => {
                println!("E: {err}");
                print_usage();
                return ParseOutcome::ExitEarly;
            }
            Err(err @ ColorError::UnknownColorName(_)) => {
                println!("E: {err}");
                print_palette();
                return ParseOutcome::ExitEarly;
            }
        }

        i += 2;
    }

    ParseOutcome::Continue(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_yields_the_defaults() {
        assert_eq!(
            parse(&[]),
            ParseOutcome::Continue(ColorConfig::default())
        );
    }

    #[test]
    fn help_and_colors_exit_early() {
        assert_eq!(parse(&args(&["-h"])), ParseOutcome::ExitEarly);
        assert_eq!(parse(&args(&["--help"])), ParseOutcome::ExitEarly);
        assert_eq!(parse(&args(&["-c"])), ParseOutcome::ExitEarly);
        assert_eq!(parse(&args(&["--colors"])), ParseOutcome::ExitEarly);
    }

    #[test]
    fn two_valid_flags_set_exactly_those_slots() {
        let outcome = parse(&args(&["-b", "FFFFFF", "-F", "AED6F1"]));
        let ParseOutcome::Continue(colors) = outcome else {
            panic!("expected Continue, got {outcome:?}");
        };

        assert_eq!(colors.bg_charge, Rgb::from_bytes(0xFF, 0xFF, 0xFF));
        assert_eq!(colors.fg_discharge, Rgb::from_bytes(0xAE, 0xD6, 0xF1));

        let defaults = ColorConfig::default();
        assert_eq!(colors.bg_discharge, defaults.bg_discharge);
        assert_eq!(colors.fg_charge, defaults.fg_charge);
    }

    #[test]
    fn long_flags_and_named_colors_work() {
        let outcome = parse(&args(&["--fg-charge", "white", "--bg-discharge", "sky"]));
        let ParseOutcome::Continue(colors) = outcome else {
            panic!("expected Continue, got {outcome:?}");
        };
        assert_eq!(colors.fg_charge, Rgb::from_name("white").unwrap());
        assert_eq!(colors.bg_discharge, Rgb::from_name("sky").unwrap());
    }

    #[test]
    fn trailing_flag_without_argument_exits_early() {
        assert_eq!(parse(&args(&["-b"])), ParseOutcome::ExitEarly);
        assert_eq!(
            parse(&args(&["-f", "000000", "-B"])),
            ParseOutcome::ExitEarly
        );
    }

    #[test]
    fn bad_specs_exit_early() {
        assert_eq!(parse(&args(&["-b", "FFFFF"])), ParseOutcome::ExitEarly);
        assert_eq!(parse(&args(&["-b", "GGGGGG"])), ParseOutcome::ExitEarly);
        assert_eq!(parse(&args(&["-F", "no-such-color"])), ParseOutcome::ExitEarly);
    }

    #[test]
    fn unrecognized_flag_exits_early() {
        assert_eq!(parse(&args(&["--frobnicate"])), ParseOutcome::ExitEarly);
        assert_eq!(parse(&args(&["-b", "000000", "-x"])), ParseOutcome::ExitEarly);
    }
}
