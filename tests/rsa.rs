//! Validation and CRT signing flow for a known-good RSA-2048 key.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use bigmod::{
    mod_exp_consttime, mod_exp_vartime, BigUint, Error, RandBigInt, RsaKey, RsaKeyParams,
};

const N: &str =
    "B4628492B5EBC4C4B3DAD4AE3650D95EAAFECB537AA75F39833A1BCCEC0111E663189C492E05055BD7770A65\
     38453B581F7611938C0E47E76F5D32F8F09B515D34637F309C7FBBB5C271FAF983BB7FF3672BF5C63377CF99\
     912BDED7F3E1B40BE9ED92555E78DE85EBC256AABD9485D55232AD9F133ABABE1A44B9F1917150B694CC577C\
     12DB052632DCF66F813B1C032BC678E7FFFB9330BD3BA1AC6124AAB40DC8A6DD6D712E70787B6E0120EA0803\
     54C8638C9186599CDE47C6D0E7608E4518AAE07CA363275423C91025750D403C4B450406AD7873C832EED920\
     80F962CAF618CBD864596448A0C09F7B166DEC20E04D832F95319EE3DBE5C5160783C38B";
const E: &str = "10001";
const P: &str =
    "D9E3B0DEA5B59900B94D591ECE6B637E34DD1488C14855260567ACB728FFB1DF099886DBAEFAE43D927B8CD9\
     6A4EEDDE36B7FB6560B60F2E6ADEE25D340B867C2D6F2FE75FC8F039003CB984A4DBA2AC5EF5A0E3B99C0683\
     B20B210A3A8C7796E09EDFB1104D513E8888B949C4BE11609C284091B4C30FFBCBC8A7F3D681DB8F";
const Q: &str =
    "D3EF81807742DFAD42023D4551B3A6B44D6B4FE855CDFF01EA2B75AB897F4BB386EB871140BD15398C455883\
     2693906B49F68EB33450201F984E675D8CF975060104DFE7B4635030B576EA973FD2144162F917F05FDB92DB\
     7E4299571AFB6D159B3E79FEFAE37BE0D73D275F95E5DF022A9D43C2793F1E3304BF425165100A45";
const D: &str =
    "3E584A8FD6769D748AE1185EFA00E99011B3AC9CB6A8C07DC54041398B5C374E94737E18C0E2155F0FD261F2\
     68076DA26085533FD6C95CCABDAFCD9D42B3BBE465E5F9A0D886415F69CC313D29ED952490451E561995D057\
     B8581C5631419214080F0763A01A5076A2EC713DE3F64067615888AF915ADC0E365008A0586F7CC0799024E6\
     A4895F997141D8AF362A18723112958A1FA69429BBC2FFF37C7C60A151857302B3C15E70CC356F62C93101C6\
     0B6BBFBF99C6C658A8DBB7DDFEF5E97C9AACC5652739878800F2407BF1BD435CB494F1BA9272D50A345171AA\
     0B1ED7C33AE5EEE7C9210155CDD29C3F2B137D81CF9B3457AA8B37FE2AE68E695A03C769";
const DMP1: &str =
    "C9A888F6D7A945ED3C9310CB89422CB80ED71A7D235DFDA88DD211310799F716B4FBDCBC8FAB16F8C18CE5A4\
     0756FBA1F144C040688CB76A3F70FF5241ABF51112BFD8372D187CF4547ADF3C9B93C76FFF07189C0B1A1391\
     698411553530F231CABC5FCDB187CD8CB1B2D0C22C7BB8FB902B54EF45BC4F1BBCD47E55180FE193";
const DMQ1: &str =
    "AE39D2883D82A846D260ECE5B388B09EC0965B9670136C73B2820FB5F8CEC0F8D10D8677D4749CA236823B85\
     758D11C86181634646D727D1517002E19126F1E101AD743412C3220528E89D69C1797E55527BDC062B87626F\
     3698A15E4E3C2B2CFBF69C6BD4EC75C61CAB9556AAEFD22901C74F10EC83CADBBE274CE984DF6ED1";
const IQMP: &str =
    "665F161E1F49F3801707D582B6EB13CDB9F48BD329A31637796097204C539BD5AF4F42A759E57C9BD85B4D12\
     3A5470BD26309FC1B17F3012364AC1CB226FF69C5E3D29504A7DB67FB48C5E5D300FCB554CC2F51C5CEC433C\
     804E5811A5895EDD0CBB211A657EC97BECEA05BF53C9D58AE0898D676057DE55B3277A84AAB78123";

fn hex(s: &str) -> BigUint {
    let (v, used) = BigUint::parse_hex(s).unwrap();
    assert_eq!(used, s.len());
    v
}

struct Material {
    n: BigUint,
    e: BigUint,
    p: BigUint,
    q: BigUint,
    dmp1: BigUint,
    dmq1: BigUint,
    iqmp: BigUint,
    d: BigUint,
}

fn material() -> Material {
    Material {
        n: hex(N),
        e: hex(E),
        p: hex(P),
        q: hex(Q),
        dmp1: hex(DMP1),
        dmq1: hex(DMQ1),
        iqmp: hex(IQMP),
        d: hex(D),
    }
}

fn build(m: &Material) -> Result<RsaKey, Error> {
    let params = RsaKeyParams {
        n: &m.n,
        e: &m.e,
        p: &m.p,
        q: &m.q,
        dmp1: &m.dmp1,
        dmq1: &m.dmq1,
        iqmp: &m.iqmp,
    };
    RsaKey::new(&params, &m.d)
}

#[test]
fn accepts_consistent_key() {
    let m = material();
    let key = build(&m).unwrap();
    assert_eq!(key.mont_n().modulus(), &m.n);
    assert_eq!(key.public_exponent(), &m.e);
}

#[test]
fn rejects_every_single_field_corruption() {
    let two = hex("2");

    let mut m = material();
    m.n = &m.n + &two;
    assert_eq!(build(&m).err(), Some(Error::NNotEqualPQ));

    let mut m = material();
    m.e = hex("10000");
    assert_eq!(build(&m).err(), Some(Error::BadRsaParameters));

    let mut m = material();
    std::mem::swap(&mut m.p, &mut m.q);
    assert_eq!(build(&m).err(), Some(Error::BadRsaParameters));

    let mut m = material();
    m.p = &m.p + &two;
    assert_eq!(build(&m).err(), Some(Error::NNotEqualPQ));

    let mut m = material();
    m.q = &m.q + &two;
    assert_eq!(build(&m).err(), Some(Error::NNotEqualPQ));

    let mut m = material();
    m.dmp1 = &m.dmp1 + &two;
    assert_eq!(build(&m).err(), Some(Error::CrtValuesIncorrect));

    let mut m = material();
    m.dmq1 = &m.dmq1 + &two;
    assert_eq!(build(&m).err(), Some(Error::CrtValuesIncorrect));

    let mut m = material();
    m.iqmp = &m.iqmp + &two;
    assert_eq!(build(&m).err(), Some(Error::CrtValuesIncorrect));

    let mut m = material();
    m.iqmp = m.p.clone();
    assert_eq!(build(&m).err(), Some(Error::CrtValuesIncorrect));

    // A wrong witness implicates dmp1/dmq1.
    let mut m = material();
    m.d = &m.d + &two;
    assert_eq!(build(&m).err(), Some(Error::CrtValuesIncorrect));
}

#[test]
fn crt_signing_flow_matches_direct_exponentiation() {
    let m = material();
    let key = build(&m).unwrap();
    let mut rng = ChaChaRng::from_seed([17u8; 32]);
    let c = rng.gen_biguint_below(&m.n);

    // Direct: c^d mod n. The witness is fine for a test; real signing
    // never touches d.
    let direct = mod_exp_vartime(&c, &m.d, key.mont_n()).unwrap();

    // CRT: two half-size constant-time exponentiations, then recombine.
    let c_p = c.div_rem(key.mont_p().modulus()).unwrap().1;
    let c_q = c.div_rem(key.mont_q().modulus()).unwrap().1;
    let m1 = mod_exp_consttime(&c_p, key.dmp1(), key.mont_p()).unwrap();
    let m2 = mod_exp_consttime(&c_q, key.dmq1(), key.mont_q()).unwrap();

    // h = iqmp * (m1 - m2) mod p; m2 < q < p, so both are reduced mod p.
    let diff = m1.mod_sub_quick(&m2, key.mont_p().modulus());
    let h = key.mont_p().mul(key.iqmp_mont(), &diff);
    // m = m2 + h * q, using q in Montgomery form w.r.t. n.
    let hq = key.mont_n().mul(&h, key.qmn_mont());
    let sig = &m2 + &hq;

    assert_eq!(sig, direct);

    // And the public exponent undoes it.
    let back = mod_exp_vartime(&sig, key.public_exponent(), key.mont_n()).unwrap();
    assert_eq!(back, c);
}
