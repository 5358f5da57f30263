extern crate tonic_build;

fn main() {
    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .type_attribute("Member", "#[derive(Eq)]")
        .compile(
            &["src/protos/admin.proto", "src/protos/stats.proto"],
            &["src/protos/"],
        )
        .unwrap();

    // https://github.com/hyperium/tonic/blob/master/tonic-build/README.md
}
