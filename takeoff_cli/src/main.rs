//! # Take-off CLI Application
//!
//! Reads a worksheet file, runs the estimate for one floor (or all floors)
//! and prints the material summary. Without a worksheet it runs a small
//! built-in two-storey demo.
//!
//! ```text
//! takeoff_cli [WORKSHEET] [--floor NAME] [--json] [--comma] [--svg PATH] [--template PATH]
//! ```
//!
//! Set `RUST_LOG=debug` to see the pipeline's logging.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{debug, error};
use takeoff_core::calculations::{CalculatorKind, Vertex};
use takeoff_core::file_io::{load_worksheet, save_worksheet};
use takeoff_core::floor::FloorFilter;
use takeoff_core::report::{render_svg, render_text, DecimalSeparator};
use takeoff_core::rows::RowSet;
use takeoff_core::worksheet::Worksheet;
use takeoff_core::{CalcError, CalcResult};

const USAGE: &str = "\
Usage: takeoff_cli [WORKSHEET] [options]

Options:
  --floor NAME       Only count rows on this floor (default: all floors)
  --json             Print the full estimate as JSON
  --comma            Use a decimal comma in the text report
  --svg PATH         Write the land parcel drawing to PATH
  --template PATH    Write a starter worksheet to PATH and exit
  -h, --help         Show this message";

#[derive(Debug, Default)]
struct Options {
    worksheet: Option<PathBuf>,
    floor: String,
    json: bool,
    separator: DecimalSeparator,
    svg: Option<PathBuf>,
    template: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--floor" => {
                options.floor = args.next().ok_or("--floor needs a floor name")?;
            }
            "--json" => options.json = true,
            "--comma" => options.separator = DecimalSeparator::Comma,
            "--svg" => {
                options.svg = Some(args.next().ok_or("--svg needs a path")?.into());
            }
            "--template" => {
                options.template = Some(args.next().ok_or("--template needs a path")?.into());
            }
            "-h" | "--help" => options.help = true,
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{}'", flag)),
            path => {
                if options.worksheet.is_some() {
                    return Err(format!("Unexpected argument '{}'", path));
                }
                options.worksheet = Some(path.into());
            }
        }
    }
    Ok(options)
}

/// Two floors, a few elements each, and an L-shaped lot.
fn demo_worksheet() -> CalcResult<Worksheet> {
    let mut sheet = Worksheet::new("Demo house", "Demo client");

    sheet.footings = sheet.footings.with_field(0, "count", "6")?;

    sheet.beams = sheet
        .beams
        .with_default_added()
        .with_field(1, "floor", "Pav1")?
        .with_field(1, "label", "V2")?
        .with_field(1, "length_m", "4.5")?;

    sheet.columns = sheet
        .columns
        .with_field(0, "count", "6")?
        .with_default_added()
        .with_field(1, "floor", "Pav1")?
        .with_field(1, "count", "6")?;

    sheet.slabs = sheet
        .slabs
        .with_field(0, "area_m2", "60")?
        .with_default_added()
        .with_field(1, "floor", "Pav1")?
        .with_field(1, "kind", "subfloor")?
        .with_field(1, "thickness_cm", "5")?
        .with_field(1, "area_m2", "60")?;

    sheet.masonry = sheet.masonry.with_field(0, "area_m2", "85")?;
    sheet.plaster = sheet
        .plaster
        .with_field(0, "area_m2", "85")?
        .with_field(0, "sides", "2")?;

    sheet.land = RowSet::from_rows(vec![
        Vertex::new("0", "0"),
        Vertex::new("12", "0"),
        Vertex::new("12", "8"),
        Vertex::new("6", "8"),
        Vertex::new("6", "20"),
        Vertex::new("0", "20"),
    ]);

    Ok(sheet)
}

fn run(options: &Options) -> CalcResult<()> {
    if let Some(path) = &options.template {
        save_worksheet(&Worksheet::new("New worksheet", ""), path)?;
        println!("Template written to {}", path.display());
        return Ok(());
    }

    let sheet = match &options.worksheet {
        Some(path) => load_worksheet(path)?,
        None => {
            println!("No worksheet given. Running built-in demo...");
            println!();
            demo_worksheet()?
        }
    };

    let filter = FloorFilter::from_selection(&options.floor);
    debug!(
        "worksheet '{}': floors {:?}, active {:?}",
        sheet.meta.name,
        sheet.floors(),
        sheet.active.iter().map(CalculatorKind::display_name).collect::<Vec<_>>()
    );

    let estimate = sheet.estimate(&filter);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("═══════════════════════════════════════");
        println!("  TAKE-OFF: {}", sheet.meta.name);
        if !sheet.meta.client.is_empty() {
            println!("  Client: {}", sheet.meta.client);
        }
        println!("═══════════════════════════════════════");
        println!();
        print!("{}", render_text(&estimate, options.separator));
    }

    if let Some(path) = &options.svg {
        match render_svg(&estimate, options.separator) {
            Some(svg) => {
                fs::write(path, svg).map_err(|e| {
                    CalcError::file_error("write svg", path.display().to_string(), e.to_string())
                })?;
                println!("Land drawing written to {}", path.display());
            }
            None => eprintln!("Land survey incomplete; no drawing written"),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    if options.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} ({})", e, e.error_code());
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeoff_core::consolidation::MaterialItem;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["site.json", "--floor", "Pav1", "--comma", "--json"])).unwrap();
        assert_eq!(options.worksheet, Some(PathBuf::from("site.json")));
        assert_eq!(options.floor, "Pav1");
        assert_eq!(options.separator, DecimalSeparator::Comma);
        assert!(options.json);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&["--floor"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
    }

    #[test]
    fn test_demo_worksheet() {
        let sheet = demo_worksheet().unwrap();
        assert_eq!(sheet.floors(), vec!["Térreo".to_string(), "Pav1".to_string()]);

        let all = sheet.estimate(&FloorFilter::All);
        let upper = sheet.estimate(&FloorFilter::from_selection("Pav1"));
        assert!(all.consolidated.get(MaterialItem::Cement) > upper.consolidated.get(MaterialItem::Cement));

        // L-shape: 12×8 plus 6×12
        assert_eq!(all.land.area_m2, Some(168.0));
    }
}
