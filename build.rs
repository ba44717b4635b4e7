use rustc_version::{version, version_meta, Channel};

fn main() {
    println!("cargo:rustc-check-cfg=cfg(rustc_nightly)");
    println!("cargo:rustc-check-cfg=cfg(rustc_beta)");

    let ver = version().expect("rustc version");
    assert!(ver.major >= 1);

    // `#[bench]` needs the unstable `test` crate
    match version_meta().expect("rustc version metadata").channel {
        Channel::Nightly => {
            println!("cargo:rustc-cfg=rustc_nightly");
        }
        Channel::Beta => {
            println!("cargo:rustc-cfg=rustc_beta");
        }
        _ => {}
    }
}
