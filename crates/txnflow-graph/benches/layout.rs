use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use txnflow_graph::{LayoutOptions, layout_transactions};
use txnflow_model::{
    Address, AppCallTransaction, ApplicationId, AssetRef, AssetTransferSubtype,
    AssetTransferTransaction, PaymentTransaction, Transaction,
};

fn account(i: usize) -> Address {
    Address::new(format!("ACCOUNT{i}"))
}

/// `groups` top-level app calls, each with `fanout` inner transfers that mix payments and
/// clawbacks across a shared pool of accounts.
fn build_transactions(groups: usize, fanout: usize, accounts: usize) -> Vec<Transaction> {
    (0..groups)
        .map(|g| {
            let application_id = (g % 8) as ApplicationId + 1;
            let inner = (0..fanout)
                .map(|k| {
                    let receiver = account((g * 7 + k) % accounts);
                    if k % 3 == 0 {
                        AssetTransferTransaction {
                            sender: Address::new(format!("APP{application_id}")),
                            receiver,
                            asset: AssetRef::new((k % 5) as u64),
                            amount: k as u64,
                            subtype: AssetTransferSubtype::Clawback {
                                clawback_from: account((g + k) % accounts),
                            },
                            ..Default::default()
                        }
                        .into()
                    } else {
                        PaymentTransaction {
                            sender: account(k % accounts),
                            receiver,
                            amount: k as u64,
                            ..Default::default()
                        }
                        .into()
                    }
                })
                .collect();
            AppCallTransaction {
                sender: account(g % accounts),
                application_id,
                inner_transactions: inner,
                ..Default::default()
            }
            .into()
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_transactions");
    group.measurement_time(Duration::from_secs(10));

    let options = LayoutOptions::default()
        .with_app_address(|id: ApplicationId| Address::new(format!("APP{id}")));
    let cases = [
        ("groups_16_f4", 16usize, 4usize, 12usize),
        ("groups_64_f8", 64usize, 8usize, 40usize),
        ("groups_256_f16", 256usize, 16usize, 128usize),
    ];

    for (name, groups, fanout, accounts) in cases {
        let txns = build_transactions(groups, fanout, accounts);
        group.bench_with_input(BenchmarkId::new("layout", name), &txns, |b, txns| {
            b.iter(|| {
                let graph = layout_transactions(black_box(txns), &options);
                black_box(graph.rows.len());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
