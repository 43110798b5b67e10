use std::fs;
use std::process;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", lex_grid::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        lex_grid::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: compositor.max_span_length={}, compositor.separator={:?}, node.overriding_score={}",
        s.compositor.max_span_length, s.compositor.separator, s.node.overriding_score
    );
}
