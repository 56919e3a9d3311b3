fn main() {
    // ESP-IDF sysenv propagation only applies to on-target builds;
    // host-side test builds run with --no-default-features.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
