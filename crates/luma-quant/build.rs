use std::env;
use std::f64::consts::PI;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Row `i` of the orthonormal type-II DCT basis, sampled at position `j`.
fn basis(i: usize, j: usize) -> f64 {
    if i == 0 {
        (0.125f64).sqrt()
    } else {
        0.5 * ((i * (2 * j + 1)) as f64 * PI / 16.0).cos()
    }
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("dct_basis.rs");
    let mut file = File::create(&dest_path).unwrap();

    writeln!(file, "/// Orthonormal 8x8 DCT-II basis matrix").unwrap();
    writeln!(file, "/// Row: frequency, column: sample position").unwrap();
    writeln!(file, "pub static DCT_BASIS: [[f64; 8]; 8] = [").unwrap();
    for i in 0..8 {
        write!(file, "    [").unwrap();
        for j in 0..8 {
            write!(file, "{:.17e}, ", basis(i, j)).unwrap();
        }
        writeln!(file, "],").unwrap();
    }
    writeln!(file, "];").unwrap();

    println!("cargo::rerun-if-changed=build.rs");
}
