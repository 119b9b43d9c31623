//! Property-based tests for the layer, macro and page codecs.

use blusb_keyboard::{Layer, Layers, Macro, MacroTable, PageReader, PageStatus, PageWriter};
use blusb_transport::protocol::{feature, matrix, page};
use proptest::prelude::*;

fn arb_layer() -> impl Strategy<Value = Layer> {
    prop::collection::vec(any::<u16>(), matrix::KEYS).prop_map(|codes| {
        let mut grid = [[0u16; matrix::COLS]; matrix::ROWS];
        for (i, code) in codes.into_iter().enumerate() {
            grid[i / matrix::COLS][i % matrix::COLS] = code;
        }
        Layer::from_matrix(grid)
    })
}

fn arb_layers(max: usize) -> impl Strategy<Value = Layers> {
    prop::collection::vec(arb_layer(), 0..=max).prop_map(|v| Layers::new(v).unwrap())
}

fn arb_macro_table() -> impl Strategy<Value = MacroTable> {
    prop::collection::vec(any::<[u8; 8]>(), 24).prop_map(|entries| {
        let mut table = MacroTable::default();
        for (slot, e) in table.entries_mut().iter_mut().zip(entries) {
            *slot = Macro {
                mods: e[0],
                reserved: e[1],
                keys: [e[2], e[3], e[4], e[5], e[6], e[7]],
            };
        }
        table
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Layers survive binary encoding plus page transfer, including padding.
    #[test]
    fn prop_layers_through_pager(layers in arb_layers(6)) {
        let blob = layers.to_bytes();
        let mut reader = PageReader::new(feature::LAYERS);
        let mut last = PageStatus::More;
        for p in PageWriter::new(feature::LAYERS, &blob).unwrap() {
            last = reader.push(&p).unwrap();
        }
        prop_assert_eq!(last, PageStatus::Complete);
        prop_assert_eq!(Layers::from_bytes(reader.bytes()).unwrap(), layers);
    }

    /// Text form parses back to the same layers.
    #[test]
    fn prop_layers_text_roundtrip(layers in arb_layers(4)) {
        let text = layers.to_text();
        prop_assert_eq!(Layers::from_text(&text).unwrap(), layers);
    }

    /// Macro table survives both binary framings and the text form.
    #[test]
    fn prop_macro_table_roundtrip(table in arb_macro_table()) {
        let prefixed = table.to_transport_bytes();
        prop_assert_eq!(prefixed.len(), 193);
        prop_assert_eq!(MacroTable::from_transport_bytes(&prefixed).unwrap(), table);
        prop_assert_eq!(MacroTable::from_device_bytes(&prefixed[1..]).unwrap(), table);
        prop_assert_eq!(MacroTable::from_text(&table.to_text()).unwrap(), table);
    }

    /// Page count is the ceiling of len / 256, every page is full size and
    /// numbered 1..=total under a constant total.
    #[test]
    fn prop_page_segmentation(len in 0usize..4000) {
        let blob = vec![0xA5u8; len];
        let pages: Vec<Vec<u8>> = PageWriter::new(feature::LAYERS, &blob).unwrap().collect();
        let total = len.div_ceil(page::DATA_SIZE);
        prop_assert_eq!(pages.len(), total);
        for (i, p) in pages.iter().enumerate() {
            prop_assert_eq!(p.len(), page::SIZE);
            prop_assert_eq!(p[1] as usize, total);
            prop_assert_eq!(p[2] as usize, i + 1);
        }
        let data: usize = pages
            .iter()
            .map(|p| p[3..].iter().filter(|&&b| b == 0xA5).count())
            .sum();
        prop_assert_eq!(data, len);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    /// Binary codec handles every layer count the count byte allows.
    #[test]
    fn prop_layers_binary_roundtrip(layers in arb_layers(255)) {
        let blob = layers.to_bytes();
        prop_assert_eq!(blob.len(), 1 + layers.len() * 320);
        prop_assert_eq!(Layers::from_bytes(&blob).unwrap(), layers);
    }

    /// Large layer sets (up to 200) still fit the 255-page limit.
    #[test]
    fn prop_many_layers_through_pager(layers in arb_layers(200)) {
        let blob = layers.to_bytes();
        let writer = PageWriter::new(feature::LAYERS, &blob).unwrap();
        let mut reader = PageReader::new(feature::LAYERS);
        for p in writer {
            reader.push(&p).unwrap();
        }
        prop_assert!(reader.is_complete());
        prop_assert_eq!(Layers::from_bytes(reader.bytes()).unwrap(), layers);
    }
}
