use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mlp_classifier::{Dataset, FitConfig, MlpBuilder, Shuffle, UpstreamWeights};

fn main() -> mlp_classifier::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Three noisy blobs in 2D, one per class.
    let mut rng = StdRng::seed_from_u64(0);
    let centers = [[-1.0_f64, -1.0], [1.0, -1.0], [0.0, 1.0]];
    let n_per_class = 128;
    let mut xs = Vec::with_capacity(3 * n_per_class);
    let mut ys = Vec::with_capacity(3 * n_per_class);

    for (class, center) in centers.iter().enumerate() {
        for _ in 0..n_per_class {
            let x0 = center[0] + rng.gen_range(-0.4..0.4);
            let x1 = center[1] + rng.gen_range(-0.4..0.4);
            xs.push(vec![x0, x1]);

            let mut one_hot = vec![0_u8; 3];
            one_hot[class] = 1;
            ys.push(one_hot);
        }
    }
    let train = Dataset::from_rows(&xs, &ys)?;

    let mut mlp = MlpBuilder::new(2)?
        .hidden_layer_named(16, "ReLU")?
        .output_layer(3)?
        .upstream_weights(UpstreamWeights::PreUpdate)
        .build_with_seed(0)?;

    let report = mlp.fit(
        &train,
        &FitConfig {
            epochs: 200,
            lr: 0.05,
            batch_size: 32,
            shuffle: Shuffle::Seeded(0),
            log_every: Some(50),
        },
    )?;
    println!("final_loss={:.6}", report.final_loss);

    print!("{}", mlp.evaluate(&train)?);
    Ok(())
}
