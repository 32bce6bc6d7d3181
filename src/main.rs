use clap::Parser;

mod datatypes;
mod error;
mod parser;
mod writer;

/// Converts an stp exchange file into RFEM6 model XML
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the input .stp file
    input: String,

    /// Path of the output .xml file
    output: String,
}

fn main() {
    let args = Args::parse();

    let result = parser::run(&args.input).and_then(|model| writer::xml_output(&model, &args.output));

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
