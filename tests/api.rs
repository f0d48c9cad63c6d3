use mlp_classifier::{
    Activation, ConfusionMatrix, Dataset, Error, FitConfig, HiddenLayer, LogisticRegression, Mlp,
    MlpBuilder, UpstreamWeights,
};

fn small_mlp() -> Mlp {
    Mlp::new_with_seed(3, 4, 2, Activation::Sigmoid, 0).unwrap()
}

#[test]
fn untrained_model_predicts_uniformly() {
    let mlp = small_mlp();
    let probs = mlp.probabilities(&[0.3, -1.0, 2.0]).unwrap();
    assert_eq!(probs, vec![0.5, 0.5]);
    // Ties resolve to the first class.
    assert_eq!(mlp.predict(&[0.3, -1.0, 2.0]).unwrap(), vec![1, 0]);
}

#[test]
fn predict_rejects_bad_samples() {
    let mlp = small_mlp();
    assert!(matches!(mlp.predict(&[1.0, 2.0]), Err(Error::InvalidShape(_))));
    assert!(matches!(
        mlp.predict(&[1.0, f64::INFINITY, 0.0]),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(mlp.probabilities(&[]), Err(Error::InvalidShape(_))));
}

#[test]
fn train_rejects_empty_batch() {
    let mut mlp = small_mlp();
    let inputs: [[f64; 3]; 0] = [];
    let labels: [[u8; 2]; 0] = [];
    assert!(matches!(
        mlp.train(&inputs, &labels, 0.1),
        Err(Error::InvalidShape(_))
    ));
}

#[test]
fn unknown_activation_name_is_a_config_error() {
    let err = "softplus".parse::<Activation>().unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(err.to_string().contains("softplus"));

    let mlp = MlpBuilder::new(2)
        .unwrap()
        .hidden_layer_named(2, " relu ")
        .unwrap()
        .output_layer(2)
        .unwrap()
        .build_with_seed(0)
        .unwrap();
    assert_eq!(mlp.activation(), Activation::ReLU);
}

#[test]
fn every_activation_trains_without_error() {
    let inputs = [[0.0, 1.0, -1.0], [2.0, 0.5, 0.0]];
    let labels = [[1u8, 0], [0, 1]];
    for activation in Activation::ALL {
        let mut mlp = MlpBuilder::new(3)
            .unwrap()
            .hidden_layer(5, activation)
            .unwrap()
            .output_layer(2)
            .unwrap()
            .upstream_weights(UpstreamWeights::PreUpdate)
            .build_with_seed(4)
            .unwrap();
        for _ in 0..20 {
            mlp.train(&inputs, &labels, 0.1).unwrap();
        }
        let probs = mlp.probabilities(&inputs[0]).unwrap();
        assert!(probs.iter().all(|p| p.is_finite() && *p >= 0.0 && *p <= 1.0));
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12, "{activation}");
    }
}

#[test]
fn layers_assemble_into_a_model() {
    let hidden = HiddenLayer::from_parts(
        2,
        2,
        Activation::ReLU,
        vec![1.0, 0.0, 0.0, 1.0],
        vec![0.0, 0.0],
    )
    .unwrap();
    let output =
        LogisticRegression::from_parts(2, 2, vec![1.0, 0.0, 0.0, 1.0], vec![0.0, 0.0]).unwrap();
    let mlp = Mlp::from_layers(hidden, output).unwrap();

    assert_eq!(mlp.predict(&[3.0, 1.0]).unwrap(), vec![1, 0]);
    assert_eq!(mlp.predict(&[-3.0, 1.0]).unwrap(), vec![0, 1]);
}

#[test]
fn from_parts_rejects_wrong_lengths() {
    assert!(HiddenLayer::from_parts(2, 2, Activation::Tanh, vec![0.0; 3], vec![0.0; 2]).is_err());
    assert!(HiddenLayer::from_parts(2, 2, Activation::Tanh, vec![0.0; 4], vec![0.0; 1]).is_err());
    assert!(LogisticRegression::from_parts(2, 3, vec![0.0; 6], vec![0.0; 2]).is_err());
}

#[test]
fn dataset_and_model_must_agree() {
    let data = Dataset::from_rows(&[vec![0.0, 1.0]], &[vec![0, 0, 1]]).unwrap();
    let mut mlp = Mlp::new_with_seed(2, 3, 2, Activation::Tanh, 0).unwrap();

    assert!(matches!(mlp.loss(&data), Err(Error::InvalidShape(_))));
    assert!(matches!(mlp.evaluate(&data), Err(Error::InvalidShape(_))));
    assert!(matches!(
        mlp.fit(&data, &FitConfig::default()),
        Err(Error::InvalidShape(_))
    ));
}

#[test]
fn fit_rejects_invalid_config_before_training() {
    let data = Dataset::from_rows(&[vec![0.0, 1.0]], &[vec![0, 1]]).unwrap();
    let mut mlp = Mlp::new_with_seed(2, 3, 2, Activation::Tanh, 0).unwrap();
    let before = mlp.clone();

    let cfg = FitConfig {
        batch_size: 0,
        ..FitConfig::default()
    };
    assert!(matches!(mlp.fit(&data, &cfg), Err(Error::InvalidConfig(_))));
    assert_eq!(mlp, before);
}

#[test]
fn confusion_matrix_from_model_predictions() {
    let hidden = HiddenLayer::from_parts(1, 1, Activation::ReLU, vec![1.0], vec![0.0]).unwrap();
    let output = LogisticRegression::from_parts(1, 2, vec![-1.0, 1.0], vec![0.5, 0.0]).unwrap();
    let mlp = Mlp::from_layers(hidden, output).unwrap();

    // Logits are (0.5 - h, h), so class 1 wins once h > 0.25.
    let xs = [[0.0], [1.0], [0.1], [2.0]];
    let ys = [[1u8, 0], [1, 0], [0, 1], [0, 1]];
    let predictions: Vec<Vec<u8>> = xs.iter().map(|x| mlp.predict(x).unwrap()).collect();
    let confusion = ConfusionMatrix::from_one_hot(&predictions, &ys).unwrap();

    assert_eq!(confusion.count(0, 0), 1);
    assert_eq!(confusion.count(0, 1), 1);
    assert_eq!(confusion.count(1, 0), 1);
    assert_eq!(confusion.count(1, 1), 1);
    assert_eq!(confusion.accuracy(), Some(0.5));
}

#[cfg(feature = "serde")]
#[test]
fn fit_config_fills_missing_fields_from_defaults() {
    let cfg: FitConfig = serde_json::from_str(r#"{ "epochs": 10, "lr": 0.5 }"#).unwrap();
    assert_eq!(cfg.epochs, 10);
    assert_eq!(cfg.lr, 0.5);
    assert_eq!(cfg.batch_size, FitConfig::default().batch_size);
    assert_eq!(cfg.log_every, FitConfig::default().log_every);
}
