mod bignum;
mod magma;
