use phoneftp::ftp::execute;

#[tokio::main]
async fn main() {
    let code = execute().await;
    std::process::exit(code);
}
