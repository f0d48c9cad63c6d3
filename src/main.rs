use mlp_classifier::{Activation, Dataset, FitConfig, MlpBuilder};

/// With the `serde` feature the first argument may name a JSON `FitConfig`.
#[cfg(feature = "serde")]
fn load_config() -> mlp_classifier::Result<FitConfig> {
    use mlp_classifier::Error;

    let Some(path) = std::env::args().nth(1) else {
        return Ok(FitConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .map_err(|e| Error::InvalidConfig(format!("failed to read {path}: {e}")))?;
    let cfg: FitConfig = serde_json::from_str(&text)
        .map_err(|e| Error::InvalidConfig(format!("failed to parse {path}: {e}")))?;
    log::info!("loaded fit config from {path}");
    Ok(cfg)
}

#[cfg(not(feature = "serde"))]
fn load_config() -> mlp_classifier::Result<FitConfig> {
    Ok(FitConfig::default())
}

fn main() -> mlp_classifier::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    // Class 0 is "inputs differ", class 1 is "inputs equal".
    let ys = vec![vec![0, 1], vec![1, 0], vec![1, 0], vec![0, 1]];
    let train = Dataset::from_rows(&xs, &ys)?;

    let mut mlp = MlpBuilder::new(2)?
        .hidden_layer(3, Activation::Tanh)?
        .output_layer(2)?
        .build_with_seed(1234)?;

    let cfg = load_config()?;
    mlp.fit(&train, &cfg)?;

    for x in &xs {
        println!("{x:?} -> {:?}", mlp.predict(x)?);
    }
    print!("{}", mlp.evaluate(&train)?);

    Ok(())
}
