mod msg;
mod util;

use std::num::ParseIntError;

use arch::Word;
use color_print::{ceprintln, cprintln};
use m11asm::{
    ast::Program, error::Warning, image, layout::first_pass, source, Error, Errors, Generated,
    Options,
};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Program file (YAML)
    #[clap(short, long)]
    input: String,

    /// Output image
    #[clap(short, long)]
    output: String,

    /// Data file placed before the program
    #[clap(short, long)]
    data: Option<String>,

    /// Base load address (0x, 0o and 0b prefixes accepted)
    #[clap(short, long, default_value = "0", value_parser = parse_with_prefix)]
    base: Word,

    /// Write an octal word dump
    #[clap(long)]
    dump: Option<String>,

    /// Print a listing
    #[clap(short, long)]
    listing: bool,

    /// More logging, repeat for trace
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_with_prefix(s: &str) -> Result<Word, ParseIntError> {
    let (radix, num) = match s.get(..2) {
        Some("0b") => (2, &s[2..]),
        Some("0o") => (8, &s[2..]),
        Some("0x") => (16, &s[2..]),
        _ => (10, s),
    };
    Word::from_str_radix(num, radix)
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    if let Err(e) = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

/// Warnings to show, including the layout's when generation failed.
fn warnings(program: &Program, generated: &Result<Generated, Errors>) -> Vec<Warning> {
    match generated {
        Ok(generated) => generated.warnings.clone(),
        Err(_) => first_pass(program).warnings().to_vec(),
    }
}

fn run(args: &Args) -> Result<(), Error> {
    cprintln!("<s>M11 Assembler</>");

    println!("1. Read Program");
    println!("  < {}", args.input);
    let program = source::load(&args.input)?;

    println!("2. Validate");
    m11asm::validate(&program)?;

    println!("3. Resolve Labels & Generate Binary");
    let options = Options {
        base_load_address: args.base,
    };
    let generated = m11asm::generate(&program, &options);
    for warning in &warnings(&program, &generated) {
        let (warn, note) = msg::from_warning(warning);
        let text = program.get(warning.command).map(util::command_text);
        warn.diag(&args.input, warning.line, text.as_deref());
        if let Some((note, line)) = note {
            let text = program
                .commands()
                .iter()
                .find(|command| command.line == line)
                .map(util::command_text);
            note.diag(&args.input, line, text.as_deref());
        }
    }
    let generated = generated?;

    println!("4. Write Image");
    let data = match &args.data {
        Some(path) => {
            println!("  < {}", path);
            image::read_data(path)?
        }
        None => vec![],
    };
    println!("  > {}", args.output);
    image::save_image(&args.output, &data, &generated.words)?;

    if let Some(path) = &args.dump {
        println!("  > {}", path);
        image::save_dump(path, &generated.words)?;
    }

    if args.listing {
        util::print_listing(&program, &generated);
    }
    Ok(())
}

fn main() {
    use clap::Parser;

    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(&args) {
        match e {
            Error::Assembly(errors) => {
                for diagnostic in errors.diagnostics() {
                    eprintln!("{}", diagnostic);
                }
            }
            e => ceprintln!("<r,s>error</>: {}", e),
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_numbers() {
        assert_eq!(parse_with_prefix("0"), Ok(0));
        assert_eq!(parse_with_prefix("12"), Ok(12));
        assert_eq!(parse_with_prefix("0x1F"), Ok(0x1F));
        assert_eq!(parse_with_prefix("0o1000"), Ok(0o1000));
        assert_eq!(parse_with_prefix("0b101"), Ok(0b101));
        assert!(parse_with_prefix("0x").is_err());
        assert!(parse_with_prefix("70000").is_err());
    }

    #[test]
    fn warnings_survive_failed_generation() {
        use arch::op;
        use m11asm::{
            ast::{Command, Operand},
            error::WarningKind,
        };

        let program = Program::new(vec![
            Command::new(op::HALT, 1).with_label("X"),
            Command::new(op::HALT, 2).with_label("X"),
            Command::one(op::JMP, Operand::label("UNDEF"), 3),
        ]);
        let options = Options {
            base_load_address: 0,
        };
        let generated = m11asm::generate(&program, &options);
        assert!(generated.is_err());
        let found = warnings(&program, &generated);
        assert_eq!(found.len(), 1);
        assert!(matches!(
            found[0].kind,
            WarningKind::RedefinedLabel { previous_line: 1, .. }
        ));
    }
}
