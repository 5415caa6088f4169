fn main() {
    // Propagate ESP-IDF environment to dependent build steps.
    // Host-target builds (tests, fuzzing) skip this entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
