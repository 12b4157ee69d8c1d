//! REQ/ROUTER envelope scenario and REQ's strict send/receive ordering.

use ironmq_core::error::Error;
use ironmq::context::Context;
use ironmq::socket::{Role, Socket};
use ironmq_core::message::Message;
use ironmq_core::settings::Settings;

#[test]
fn router_receives_requester_envelope() {
    let port = portpicker::pick_unused_port().expect("a free port");
    let context = Context::new(true);

    let router = Socket::new(&context, Role::Router, Settings::default()).unwrap();
    router.bind(&format!("tcp://*:{port}")).unwrap();

    let requester = Socket::new(&context, Role::Requester, Settings::default()).unwrap();
    requester
        .connect(&format!("tcp://127.0.0.1:{port}"))
        .unwrap();

    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut outbound = Message::new();
    outbound.enqueue_text("hello world!");
    requester.send(&mut outbound).unwrap();

    let mut inbound = Message::new();
    router.receive(&mut inbound).unwrap();

    assert_eq!(inbound.size(), 3);
    let route = inbound.dequeue_bytes().unwrap();
    assert_eq!(route.len(), 5, "routing identifier must be 5 bytes");
    let delimiter = inbound.dequeue_bytes().unwrap();
    assert!(delimiter.is_empty());
    assert_eq!(inbound.dequeue_text().as_deref(), Some("hello world!"));

    router.stop().unwrap();
    requester.stop().unwrap();
    context.stop().unwrap();
}

#[test]
fn requester_sending_twice_without_receiving_fails() {
    let port = portpicker::pick_unused_port().expect("a free port");
    let context = Context::new(true);

    let router = Socket::new(&context, Role::Router, Settings::default()).unwrap();
    router.bind(&format!("tcp://*:{port}")).unwrap();

    let requester = Socket::new(&context, Role::Requester, Settings::default()).unwrap();
    requester
        .connect(&format!("tcp://127.0.0.1:{port}"))
        .unwrap();

    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut first = Message::new();
    first.enqueue_text("one");
    requester.send(&mut first).unwrap();

    let mut second = Message::new();
    second.enqueue_text("two");
    let result = requester.send(&mut second);
    assert_eq!(result, Err(Error::SocketState));

    router.stop().unwrap();
    requester.stop().unwrap();
    context.stop().unwrap();
}
