mod gost_roundtrip;
mod permutation_roundtrip;
mod rsa_roundtrip;
