use std::fs::File;
use std::io::{BufReader, BufWriter};

use hog_detect_core::LumaImage;
use hog_detect_descriptor::{
    DatasetError, DescriptorDataset, HogDescriptor, HogParams, LabeledFeatures,
};

fn square_patch(size: usize, inset: usize) -> LumaImage {
    LumaImage::from_fn(size, size, |x, y| {
        let inside = (inset..size - inset).contains(&x) && (inset..size - inset).contains(&y);
        if inside {
            1.0
        } else {
            0.0
        }
    })
    .expect("image")
}

#[test]
fn dataset_survives_a_text_file_round_trip() {
    let hog = HogDescriptor::new(HogParams {
        bin_count: 6,
        cell_size: [4, 4],
        block_size: [2, 2],
    })
    .expect("params");
    let mut ds = DescriptorDataset::new(hog, [16, 16]);
    ds.push_image(&square_patch(24, 6).view(), true).expect("push");
    ds.push_image(&square_patch(40, 2).view(), true).expect("push");
    ds.push_image(&LumaImage::filled(16, 16, 0.2).expect("image").view(), false)
        .expect("push");
    let expected_len = ds.feature_len();
    let rows = ds.into_inner();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("features.txt");
    rows.write_text(BufWriter::new(File::create(&path).expect("create")))
        .expect("write");

    let loaded = LabeledFeatures::read_text(BufReader::new(File::open(&path).expect("open")))
        .expect("read");
    assert_eq!(loaded.labels, vec![1, 1, 0]);
    assert_eq!(loaded.len(), 3);
    for (a, b) in loaded.features.iter().zip(&rows.features) {
        assert_eq!(a.len(), expected_len);
        // Display for f32 prints the shortest representation that parses back exactly
        assert_eq!(a, b);
    }
}

#[test]
fn appended_files_with_other_lengths_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mixed.txt");

    let a = LabeledFeatures {
        features: vec![vec![0.1, 0.2, 0.3]],
        labels: vec![1],
    };
    let b = LabeledFeatures {
        features: vec![vec![0.4, 0.5]],
        labels: vec![0],
    };
    let mut file = File::create(&path).expect("create");
    a.write_text(&mut file).expect("write a");
    b.write_text(&mut file).expect("write b");
    drop(file);

    let err = LabeledFeatures::read_text(BufReader::new(File::open(&path).expect("open")))
        .expect_err("ragged rows");
    assert!(matches!(
        err,
        DatasetError::LengthMismatch {
            line: 2,
            expected: 3,
            got: 2
        }
    ));
}

#[test]
fn empty_file_reads_as_empty_dataset() {
    let loaded = LabeledFeatures::read_text("\n\n".as_bytes()).expect("read");
    assert!(loaded.is_empty());
}
