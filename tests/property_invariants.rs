use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use rust_decimal::Decimal;

use stitchcart::{
    core::store::CartStore,
    item::ProductSummary,
    persist::{decode_cart_record, encode_cart_record},
};

#[derive(Debug, Clone)]
enum Action {
    Add { id_idx: u8, cents: u32 },
    AddUnits { id_idx: u8, cents: u32, units: u8 },
    Update { id_idx: u8, quantity: i8 },
    Remove { id_idx: u8 },
    Clear,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (0u8..12, 0u32..100_000).prop_map(|(id_idx, cents)| Action::Add { id_idx, cents }),
        2 => (0u8..12, 0u32..100_000, 0u8..6)
            .prop_map(|(id_idx, cents, units)| Action::AddUnits { id_idx, cents, units }),
        3 => (0u8..12, -3i8..10).prop_map(|(id_idx, quantity)| Action::Update { id_idx, quantity }),
        2 => (0u8..12).prop_map(|id_idx| Action::Remove { id_idx }),
        1 => Just(Action::Clear),
    ]
}

fn product(id_idx: u8, cents: u32) -> ProductSummary {
    ProductSummary::new(
        format!("p{id_idx}"),
        format!("Product {id_idx} @ {cents}"),
        Decimal::new(i64::from(cents), 2),
        format!("/img/{id_idx}/{cents}.jpg"),
    )
}

proptest! {
    #[test]
    fn random_sequences_preserve_cart_invariants(actions in prop::collection::vec(action_strategy(), 1..200)) {
        let mut store = CartStore::new();
        // Expected (quantity, first-captured summary) per id.
        let mut model: BTreeMap<String, (u32, ProductSummary)> = BTreeMap::new();

        for action in actions {
            match action {
                Action::Add { id_idx, cents } => {
                    let item = product(id_idx, cents);
                    model.entry(item.id.clone()).or_insert((0, item.clone())).0 += 1;
                    store.add_to_cart(item);
                }
                Action::AddUnits { id_idx, cents, units } => {
                    let item = product(id_idx, cents);
                    if units > 0 {
                        model.entry(item.id.clone()).or_insert((0, item.clone())).0 += u32::from(units);
                    }
                    store.add_units(item, u32::from(units));
                }
                Action::Update { id_idx, quantity } => {
                    let id = format!("p{id_idx}");
                    if quantity <= 0 {
                        model.remove(&id);
                    } else if let Some(entry) = model.get_mut(&id) {
                        entry.0 = quantity as u32;
                    }
                    store.update_quantity(&id, i64::from(quantity));
                }
                Action::Remove { id_idx } => {
                    let id = format!("p{id_idx}");
                    model.remove(&id);
                    store.remove_from_cart(&id);
                }
                Action::Clear => {
                    model.clear();
                    store.clear_cart();
                }
            }

            let mut seen = HashSet::new();
            for line in store.items() {
                prop_assert!(seen.insert(line.id.clone()), "duplicate id {}", line.id);
                prop_assert!(line.quantity > 0);
                let (quantity, first) = &model[&line.id];
                prop_assert_eq!(line.quantity, *quantity);
                prop_assert_eq!(&line.name, &first.name);
                prop_assert_eq!(line.price, first.price);
                prop_assert_eq!(&line.image_url, &first.image_url);
            }
            prop_assert_eq!(store.len(), model.len());

            let expected_items: u64 = store.items().iter().map(|l| u64::from(l.quantity)).sum();
            let expected_price: Decimal = store
                .items()
                .iter()
                .map(|l| l.price * Decimal::from(l.quantity))
                .sum();
            prop_assert_eq!(store.total_items(), expected_items);
            prop_assert_eq!(store.total_price(), expected_price);
        }

        let record = encode_cart_record(&store.snapshot()).expect("encode");
        let hydrated = CartStore::from_snapshot(decode_cart_record(&record).expect("decode"));
        prop_assert_eq!(hydrated.items(), store.items());
        prop_assert_eq!(hydrated.revision(), store.revision());
    }
}
