fn main() {
    labenv::run_cli();
}
