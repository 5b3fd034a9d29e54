fn main() {
    println!("cargo:rerun-if-env-changed=PUCKDROP_CONFIG_JSON");

    // ESP-IDF link arguments are only needed for device builds.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
