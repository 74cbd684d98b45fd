use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();

    server::start_server().await;
}
