use slide_rs::activation::Activation;
use slide_rs::data::BatchView;
use slide_rs::hash::WtaFactory;
use slide_rs::initializer::Initializer;
use slide_rs::network::Network;
use slide_rs::optimizer::Optimizer;
use slide_rs::scheduler::Scheduler;
use slide_rs::NetworkBuilder;
use std::sync::Arc;

#[test]
fn minimal_network_learns_a_sign_flip() {
    let mut net: Network<f32> = NetworkBuilder::new(1)
        .hidden_units(vec![1])
        .hash_tables(10)
        .hash_factory(Arc::new(WtaFactory::new(8, 1)))
        .optimizer(Optimizer::sgd(1.0, 1.0))
        .rehash_schedule(Scheduler::constant_frequency(1).unwrap())
        .activation(Activation::Linear)
        .initializer(Initializer::constant(0.0))
        .sparsity(1.0)
        .seed(7)
        .build()
        .unwrap();

    let x = [0.0f32];
    let y0 = net.forward(BatchView::new(1, &x).unwrap()).unwrap();
    assert_eq!(y0.row(0), &[0.0]);

    let dy = [1.0f32];
    net.backward(BatchView::new(1, &dy).unwrap()).unwrap();

    let y1 = net.forward(BatchView::new(1, &x).unwrap()).unwrap();
    assert_eq!(y1.row(0), &[-1.0]);
}
