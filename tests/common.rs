use rand::{rngs::StdRng, Rng, SeedableRng};

// read a fixture, dropping line breaks
#[allow(dead_code)]
pub fn read_lines(path: &str) -> Vec<u8> {
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    let file = File::open(path).unwrap();

    let mut res = Vec::new();

    for line in BufReader::new(file).lines() {
        res.extend_from_slice(&line.unwrap().as_bytes());
    }

    res
}

// random uppercase text over the first `letters` letters of the alphabet
#[allow(dead_code)]
pub fn random_text(rng: &mut StdRng, len: usize, letters: u8) -> Vec<u8> {
    (0..len).map(|_| b'A' + rng.gen_range(0, letters)).collect()
}

#[allow(dead_code)]
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x6b61_7369_736b_6921)
}
