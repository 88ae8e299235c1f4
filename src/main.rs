fn main() {
    std::process::exit(gas_analysis::app::run());
}
