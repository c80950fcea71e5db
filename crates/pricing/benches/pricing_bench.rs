use common::{OfferId, PartyId};
use criterion::{Criterion, criterion_group, criterion_main};
use pricing::{Offer, PriceTier};
use rust_decimal_macros::dec;

fn bench_flat_quote(c: &mut Criterion) {
    let offer =
        Offer::flat(OfferId::new(), PartyId::new(), dec!(0.40)).with_minimum_quantity(dec!(10));

    c.bench_function("pricing/flat_quote", |b| {
        b.iter(|| offer.quote(dec!(12.5)).unwrap());
    });
}

fn bench_tiered_quote(c: &mut Criterion) {
    let offer = Offer::tiered(
        OfferId::new(),
        PartyId::new(),
        vec![
            PriceTier::bounded(dec!(30), dec!(0.45)),
            PriceTier::bounded(dec!(60), dec!(0.40)),
            PriceTier::unbounded(dec!(0.35)),
        ],
    );

    c.bench_function("pricing/tiered_quote", |b| {
        b.iter(|| offer.quote(dec!(45)).unwrap());
    });
}

criterion_group!(benches, bench_flat_quote, bench_tiered_quote);
criterion_main!(benches);
