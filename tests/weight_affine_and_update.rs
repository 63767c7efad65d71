use slide_rs::data::Data;
use slide_rs::optimizer::Optimizer;
use slide_rs::weight::Weight;

#[test]
fn zero_weight_affine_ignores_inactive_inputs() {
    let opt = Optimizer::<f32>::sgd(1.0, 1.0);
    let w: Weight<f32> = Weight::new(1, &opt);
    assert_eq!(w.weight(0), 0.0);
    assert_eq!(w.bias(), 0.0);

    let x: Data<f32> = Data::from(vec![0.0]);
    assert_eq!(w.affine(&x, &[0]), 0.0);
    assert_eq!(w.affine(&x, &[]), 0.0);
}

#[test]
fn weight_update_shifts_affine_output() {
    let opt = Optimizer::<f32>::sgd(1.0, 1.0);
    let mut w: Weight<f32> = Weight::new(1, &opt);

    w.add_weight_grad(0, 0.5);
    w.add_bias_grad(0.2);
    w.update();

    assert_eq!(w.weight(0), -0.5);
    assert_eq!(w.bias(), -0.2);

    let x: Data<f32> = Data::from(vec![1.0]);
    assert_eq!(w.affine(&x, &[0]), -0.7);
    assert_eq!(w.affine(&x, &[]), -0.2);
}
