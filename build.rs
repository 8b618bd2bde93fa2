fn main() {
    // Host builds (tests, simulation) carry no ESP-IDF environment.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
