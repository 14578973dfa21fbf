fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match calcfind_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[calcfind-core] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = calcfind_core::runtime::run_with_options(options) {
        eprintln!("[calcfind-core] bridge failed: {error}");
        std::process::exit(1);
    }
}
