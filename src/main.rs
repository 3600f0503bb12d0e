fn main() -> std::process::ExitCode {
    studio_installer_lib::run()
}
