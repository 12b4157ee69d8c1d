//! Direct ZAP protocol echo scenario against a running [`Authenticator`].
//!
//! Both scenarios run inside one `#[test]` function: the authenticator
//! is a process-wide singleton (see `ironmq::authenticator`), so two
//! instances cannot be alive concurrently in the same test binary.

use ironmq::authenticator::{Authenticator, ZAP_ENDPOINT};
use ironmq::context::Context;
use ironmq::socket::{Role, Socket};
use ironmq_core::message::Message;
use ironmq_core::settings::Settings;

fn zap_request(version: &str, sequence: &str, domain: &str, address: &str, mechanism: &str) -> Message {
    let mut message = Message::new();
    message.enqueue_text(version);
    message.enqueue_text(sequence);
    message.enqueue_text(domain);
    message.enqueue_text(address);
    message.enqueue_text(""); // identity
    message.enqueue_text(mechanism);
    message
}

#[test]
fn zap_echo_accepts_registered_domain_and_rejects_unregistered() {
    let context = Context::new(true);
    let authenticator = Authenticator::new(context.clone()).unwrap();
    authenticator.start().unwrap();

    let guard_socket = Socket::new(&context, Role::Pair, Settings::default()).unwrap();
    authenticator.apply(&guard_socket, "testing", false).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(100));

    {
        let client = Socket::new(&context, Role::Requester, Settings::default()).unwrap();
        client.connect(ZAP_ENDPOINT).unwrap();

        let mut outbound = zap_request("1.0", "42", "testing", "127.0.0.1", "NULL");
        client.send(&mut outbound).unwrap();

        let mut inbound = Message::new();
        client.receive(&mut inbound).unwrap();

        assert_eq!(inbound.dequeue_text().as_deref(), Some("1.0"));
        assert_eq!(inbound.dequeue_text().as_deref(), Some("42"));
        assert_eq!(inbound.dequeue_text().as_deref(), Some("200"));
        assert_eq!(inbound.dequeue_text().as_deref(), Some("OK"));
        assert_eq!(inbound.dequeue_text().as_deref(), Some("anonymous"));

        client.stop().unwrap();
    }

    {
        let client = Socket::new(&context, Role::Requester, Settings::default()).unwrap();
        client.connect(ZAP_ENDPOINT).unwrap();

        let mut outbound = zap_request("1.0", "43", "unregistered", "127.0.0.1", "NULL");
        client.send(&mut outbound).unwrap();

        let mut inbound = Message::new();
        client.receive(&mut inbound).unwrap();

        assert_eq!(inbound.dequeue_text().as_deref(), Some("1.0"));
        assert_eq!(inbound.dequeue_text().as_deref(), Some("43"));
        assert_eq!(inbound.dequeue_text().as_deref(), Some("400"));

        client.stop().unwrap();
    }

    authenticator.stop().unwrap();
    context.stop().unwrap();
}
