fn main() -> std::process::ExitCode {
    long_capture_lib::run()
}
