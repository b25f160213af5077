//! Creek-banner mnemonic through the address derivator.

use hdkey_address::Address;
use hdkey_bip::KeyGenerator;
use hdkey_wallet::AddressDerivator;

const CREEK_MNEMONIC: &str =
    "creek banner employ mix teach sunny sure mutual pole mom either lion";

fn creek_seed() -> [u8; 64] {
    let mut seed = [0u8; 64];
    pbkdf2::pbkdf2_hmac::<sha2::Sha512>(CREEK_MNEMONIC.as_bytes(), b"mnemonic", 2048, &mut seed);
    seed
}

fn derivator() -> AddressDerivator {
    let mut d = AddressDerivator::new();
    d.initialize(&creek_seed()).unwrap();
    d
}

#[test]
fn test_first_addresses() {
    let addresses = derivator().addresses_for_range(0..=2).unwrap();
    let rendered: Vec<String> = addresses.iter().map(Address::to_string).collect();
    assert_eq!(
        rendered,
        [
            "0xE86935943315293154c7AD63296b4e1adAc76364",
            "0x5c9E7b93900536D9cc5559b881375Bae93c933D0",
            "0xD28293bf13549Abb49Ed1D83D515301A05E3Fc8d",
        ]
    );
}

#[test]
fn test_first_key() {
    let key = derivator().key_for_index(0).unwrap();
    assert_eq!(
        hex::encode(*key),
        "da18066dda40499e6ef67a392eda0fd90acf804448a765db9fa9b6e7dd15c322"
    );
}

#[test]
fn test_pages_are_contiguous() {
    let d = derivator();
    let all = d.addresses_for_range(0..=9).unwrap();
    let mut paged = d.addresses_for_page(0, 4).unwrap();
    paged.extend(d.addresses_for_page(4, 4).unwrap());
    paged.extend(d.addresses_for_page(8, 2).unwrap());
    assert_eq!(paged, all);
}

#[test]
fn test_parallel_range_matches_sequential() {
    let d = derivator();
    let parallel = d.addresses_for_range(0..=31).unwrap();
    let sequential: Vec<Address> = (0..=31).map(|i| d.address_for_index(i).unwrap()).collect();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_independent_instances_agree() {
    let a = derivator().addresses_for_page(100, 3).unwrap();
    let b = derivator().addresses_for_page(100, 3).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_custom_branch_path() {
    let seed = creek_seed();
    let mut d = AddressDerivator::new();
    d.initialize_with_path(&seed, "m/44'/60'/1'/0").unwrap();

    let master = KeyGenerator::master_node(&seed).unwrap();
    let expected = KeyGenerator::derive_ethereum_key(&master, 1, 0, 7).unwrap();
    assert_eq!(
        d.address_for_index(7).unwrap(),
        Address::from_key_pair(expected.key_pair())
    );
}
