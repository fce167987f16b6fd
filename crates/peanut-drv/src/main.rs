fn main() {
    if let Err(err) = peanut_drv::main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
