fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .file_descriptor_set_path(
            std::path::PathBuf::from(std::env::var("OUT_DIR")?).join("ninjagraph_descriptor.bin"),
        )
        .compile(&["proto/ninjagraph.proto"], &["proto"])?;
    Ok(())
}
