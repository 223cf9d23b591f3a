fn main() -> Result<(), Box<dyn std::error::Error>> {
    sarangbang::cli::main()
}
