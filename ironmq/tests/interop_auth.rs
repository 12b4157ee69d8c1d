//! Ironhouse (mutual curve auth) and Strawhouse (address policy)
//! end-to-end scenarios.
//!
//! Both run inside one `#[test]` function: the authenticator is a
//! process-wide singleton, so only one may be alive at a time within
//! this test binary.

use ironmq::authenticator::{Authenticator, ZAP_ENDPOINT};
use ironmq::context::Context;
use ironmq::socket::{Role, Socket};
use ironmq_core::keypair::Keypair;
use ironmq_core::message::Message;
use ironmq_core::settings::Settings;
use std::time::Duration;

fn zap_null_request(address: &str) -> Message {
    let mut message = Message::new();
    message.enqueue_text("1.0");
    message.enqueue_text("1");
    message.enqueue_text("testing");
    message.enqueue_text(address);
    message.enqueue_text("");
    message.enqueue_text("NULL");
    message
}

fn status_code(client: &Socket) -> String {
    let mut inbound = Message::new();
    client.receive(&mut inbound).unwrap();
    let _version = inbound.dequeue_text();
    let _sequence = inbound.dequeue_text();
    inbound.dequeue_text().unwrap()
}

#[test]
fn ironhouse_succeeds_and_strawhouse_first_writer_wins() {
    ironhouse_mutual_curve_auth_succeeds();
    strawhouse_deny_wins_over_later_allow();
    strawhouse_allow_wins_when_written_first();
}

fn ironhouse_mutual_curve_auth_succeeds() {
    let port = portpicker::pick_unused_port().expect("a free port");
    let server_keys = Keypair::generate();
    let client_keys = Keypair::generate();

    let context = Context::new(true);
    let authenticator = Authenticator::new(context.clone()).unwrap();
    authenticator.set_private_key(*server_keys.private());
    authenticator.allow_key(*client_keys.public());
    authenticator.start().unwrap();

    let pusher = Socket::new(&context, Role::Pusher, Settings::default()).unwrap();
    authenticator.apply(&pusher, "", true).unwrap();
    pusher.bind(&format!("tcp://*:{port}")).unwrap();

    let puller = Socket::new(&context, Role::Puller, Settings::default()).unwrap();
    puller.set_curve_client(server_keys.public()).unwrap();
    puller.set_certificate(&client_keys).unwrap();
    puller
        .connect(&format!("tcp://127.0.0.1:{port}"))
        .unwrap();

    std::thread::sleep(Duration::from_millis(150));

    let mut outbound = Message::new();
    outbound.enqueue_text("hello world!");
    pusher.send(&mut outbound).unwrap();

    let mut inbound = Message::new();
    puller.receive(&mut inbound).unwrap();
    assert_eq!(inbound.dequeue_text().as_deref(), Some("hello world!"));

    pusher.stop().unwrap();
    puller.stop().unwrap();
    authenticator.stop().unwrap();
    context.stop().unwrap();
}

fn strawhouse_deny_wins_over_later_allow() {
    let context = Context::new(true);
    let authenticator = Authenticator::new(context.clone()).unwrap();

    authenticator.deny("127.0.0.1");
    authenticator.allow("127.0.0.1");
    authenticator.start().unwrap();

    let guard_socket = Socket::new(&context, Role::Pair, Settings::default()).unwrap();
    authenticator.apply(&guard_socket, "testing", false).unwrap();

    std::thread::sleep(Duration::from_millis(100));

    let client = Socket::new(&context, Role::Requester, Settings::default()).unwrap();
    client.connect(ZAP_ENDPOINT).unwrap();
    let mut outbound = zap_null_request("127.0.0.1");
    client.send(&mut outbound).unwrap();

    assert_eq!(
        status_code(&client),
        "400",
        "first-writer-wins deny must reject the address despite the later allow"
    );

    client.stop().unwrap();
    authenticator.stop().unwrap();
    context.stop().unwrap();
}

fn strawhouse_allow_wins_when_written_first() {
    let context = Context::new(true);
    let authenticator = Authenticator::new(context.clone()).unwrap();

    authenticator.allow("127.0.0.1");
    authenticator.deny("127.0.0.1");
    authenticator.start().unwrap();

    let guard_socket = Socket::new(&context, Role::Pair, Settings::default()).unwrap();
    authenticator.apply(&guard_socket, "testing", false).unwrap();

    std::thread::sleep(Duration::from_millis(100));

    let client = Socket::new(&context, Role::Requester, Settings::default()).unwrap();
    client.connect(ZAP_ENDPOINT).unwrap();
    let mut outbound = zap_null_request("127.0.0.1");
    client.send(&mut outbound).unwrap();

    assert_eq!(
        status_code(&client),
        "200",
        "first-writer-wins allow must accept the address despite the later deny"
    );

    client.stop().unwrap();
    authenticator.stop().unwrap();
    context.stop().unwrap();
}
