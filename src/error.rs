use std::fmt::Display;

#[derive(Debug)]
pub enum ConverterError {
    Input(String),
    Parse(String),
    Output(String),
}

impl Display for ConverterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (err_name, value) = match self {
            ConverterError::Input(v) => ("Input", v),
            ConverterError::Parse(v) => ("Parse", v),
            ConverterError::Output(v) => ("Output", v),
        };

        write!(f, "{} error: {}", err_name, value)
    }
}
