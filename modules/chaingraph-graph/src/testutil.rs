//! Docker-backed Neo4j for integration tests.

use testcontainers::{
    core::{ContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use crate::GraphClient;

const BOLT_PORT: u16 = 7687;
const TEST_USER: &str = "neo4j";
const TEST_PASSWORD: &str = "chaingraph-test";

/// Start an empty Neo4j community container and connect to it.
///
/// Hold on to the returned container: dropping it stops Neo4j.
pub async fn neo4j_container() -> (ContainerAsync<GenericImage>, GraphClient) {
    let container = GenericImage::new("neo4j", "5.25.1-community")
        .with_exposed_port(ContainerPort::Tcp(BOLT_PORT))
        .with_wait_for(WaitFor::message_on_stdout("Started."))
        .with_env_var("NEO4J_AUTH", format!("{TEST_USER}/{TEST_PASSWORD}"))
        .start()
        .await
        .expect("Failed to start Neo4j container");

    let port = container
        .get_host_port_ipv4(BOLT_PORT)
        .await
        .expect("Failed to get Neo4j host port");

    let client = GraphClient::connect(&format!("bolt://127.0.0.1:{port}"), TEST_USER, TEST_PASSWORD)
        .await
        .expect("Failed to connect to Neo4j");

    (container, client)
}
