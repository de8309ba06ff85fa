use herald_core::SigningSecret;

pub fn run() -> anyhow::Result<()> {
    let secret = SigningSecret::generate();
    println!("HERALD_TOKEN__SECRET={}", secret.to_base64());
    Ok(())
}
