#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use bigmod::{mod_exp_consttime, mod_exp_vartime, BigUint, MontyReducer, RandBigInt};

fn gen_modulus(rng: &mut ChaChaRng, bits: usize) -> BigUint {
    loop {
        let m = rng.gen_biguint(bits);
        if m.is_odd() && m.bits() == bits {
            return m;
        }
    }
}

fn bench_mont_mul_2048(c: &mut Criterion) {
    let mut rng = ChaChaRng::from_seed([42u8; 32]);
    let m = gen_modulus(&mut rng, 2048);
    let ctx = MontyReducer::new(&m).unwrap();
    let a = ctx.to_mont(&rng.gen_biguint_below(&m));
    let b = ctx.to_mont(&rng.gen_biguint_below(&m));

    c.bench_function("mont_mul_2048", move |bench| {
        bench.iter(|| ctx.mul(&a, &b))
    });
}

fn bench_mod_exp_consttime_2048(c: &mut Criterion) {
    let mut rng = ChaChaRng::from_seed([43u8; 32]);
    let m = gen_modulus(&mut rng, 2048);
    let ctx = MontyReducer::new(&m).unwrap();
    let a = rng.gen_biguint_below(&m);
    let e = rng.gen_biguint(2048);

    c.bench_function("mod_exp_consttime_2048", move |bench| {
        bench.iter(|| mod_exp_consttime(&a, &e, &ctx).unwrap())
    });
}

fn bench_mod_exp_vartime_f4(c: &mut Criterion) {
    let mut rng = ChaChaRng::from_seed([44u8; 32]);
    let m = gen_modulus(&mut rng, 2048);
    let ctx = MontyReducer::new(&m).unwrap();
    let a = rng.gen_biguint_below(&m);
    let e = BigUint::from(65537u64);

    c.bench_function("mod_exp_vartime_f4", move |bench| {
        bench.iter(|| mod_exp_vartime(&a, &e, &ctx).unwrap())
    });
}

criterion_group!(
    benches,
    bench_mont_mul_2048,
    bench_mod_exp_consttime_2048,
    bench_mod_exp_vartime_f4
);
criterion_main!(benches);
