use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlchain_rust::networking::{
    api_message::CommandEnvelope,
    message_types::{block_messages::BlockMessage, Command, CommandPayload},
    peer::NodeAddr,
};

fn block_payload() -> CommandPayload {
    CommandPayload::Block(BlockMessage {
        addr_from: NodeAddr::new("127.0.0.1", 8766),
        block: vec![7; 64 * 1024],
    })
}

fn bench_envelope_serialize(c: &mut Criterion) {
    let payload = block_payload().encode().unwrap();

    c.bench_function("block envelope serialization", |b| {
        b.iter(|| {
            let envelope =
                CommandEnvelope::new("block", black_box(payload.clone()), vec![]).unwrap();
            envelope.serialize()
        })
    });
}

fn bench_envelope_deserialize(c: &mut Criterion) {
    let payload = block_payload().encode().unwrap();
    let bytes = CommandEnvelope::new("block", payload, vec![])
        .unwrap()
        .serialize();

    c.bench_function("block envelope deserialization", |b| {
        b.iter(|| {
            let envelope = CommandEnvelope::deserialize(black_box(&bytes)).unwrap();
            CommandPayload::decode(Command::Block, envelope.payload()).unwrap()
        })
    });
}

criterion_group!(benches, bench_envelope_serialize, bench_envelope_deserialize);
criterion_main!(benches);
