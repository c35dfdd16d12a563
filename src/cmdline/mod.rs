#[derive(Debug, Default, Clone)]
pub struct CommandLineOptions {
    pub files: Vec<String>,
    pub debug: bool,
}

impl CommandLineOptions {
    pub fn parse() -> Self {
        let mut options = CommandLineOptions::default();

        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "-d" | "--debug" => options.debug = true,
                _ => options.files.push(arg),
            }
        }

        options
    }
}
