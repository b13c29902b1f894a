// build.rs
use std::io::Result;

fn main() -> Result<()> {
    // Root for import resolution; the service proto has no external imports.
    let proto_roots = ["protos"];

    // Paths must be relative to one of the `proto_roots`.
    let protos_to_compile = ["protos/resource_tester.proto"];

    // Fall back to the vendored protoc when the host has none configured.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;
        // SAFETY: build scripts are single threaded at this point.
        unsafe { std::env::set_var("PROTOC", protoc) };
    }

    for proto in &protos_to_compile {
        println!("cargo:rerun-if-changed={proto}");
    }

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&protos_to_compile, &proto_roots)?;

    Ok(())
}
