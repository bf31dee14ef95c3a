use time::OffsetDateTime;
use time::macros::format_description;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Build stamp shown on the info screen and the diagnostic endpoint (UTC).
    let now = OffsetDateTime::now_utc();
    let date = now
        .format(format_description!(
            "[month repr:short] [day padding:space] [year]"
        ))
        .unwrap_or_default();
    let time = now
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default();
    println!("cargo:rustc-env=BUILD_DATE={date}");
    println!("cargo:rustc-env=BUILD_TIME={time}");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
