use mlp_classifier::{Activation, ConfusionMatrix, Mlp};

fn main() -> mlp_classifier::Result<()> {
    env_logger::init();

    // XOR, with class 0 meaning "inputs differ".
    let xs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let ys = [[0_u8, 1], [1, 0], [1, 0], [0, 1]];

    let mut mlp = Mlp::new_with_seed(2, 3, 2, Activation::Tanh, 1234)?;

    // Drive the SGD steps by hand: 2 mini-batches of 2 per epoch.
    let batch_size = 2;
    for epoch in 1..=5_000 {
        for (x, y) in xs.chunks(batch_size).zip(ys.chunks(batch_size)) {
            mlp.train(x, y, 0.1)?;
        }
        if epoch % 1_000 == 0 {
            let p = mlp.probabilities(&xs[0])?;
            println!("epoch {epoch}: p(x={:?}) = {p:.4?}", xs[0]);
        }
    }

    let predictions = xs
        .iter()
        .map(|x| mlp.predict(x))
        .collect::<mlp_classifier::Result<Vec<_>>>()?;
    for (x, p) in xs.iter().zip(&predictions) {
        println!("x={x:?} predicted={p:?}");
    }

    let confusion = ConfusionMatrix::from_one_hot(&predictions, &ys)?;
    for row in confusion.rows() {
        println!("{row:?}");
    }

    Ok(())
}
