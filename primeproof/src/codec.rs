//! Symbol codec
//!
//! Assigns every distinct token a distinct prime and encodes a token sequence as
//! the product of its tokens' primes. The product encodes the multiset of
//! tokens, not their order: `a b` and `b a` share a composite. Divisibility of
//! composites is therefore a necessary (but not sufficient) condition for one
//! sequence to occur inside another, which is what the search relies on and
//! what the verifier double-checks.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::collections::HashMap;

/// Arbitrary-precision product of per-symbol primes
pub type Composite = BigUint;

/// An opaque token; structural markers such as `{` and `}` are ordinary symbols
pub type Symbol = String;

/// Owned symbol-to-prime table
///
/// Primes are handed out in increasing order as new symbols are seen, so the
/// assignment depends only on the order in which symbols are first encoded.
#[derive(Debug, Clone, Default)]
pub struct SymbolCodec {
    primes: Vec<Composite>,
    table: HashMap<Symbol, Composite>,
    symbols: Vec<Symbol>,
}

impl SymbolCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a codec by interning `symbols` in order
    ///
    /// Given the output of [`SymbolCodec::symbols`], this reproduces the exact
    /// same prime assignment.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codec = Self::new();
        for symbol in symbols {
            codec.intern(symbol.as_ref());
        }
        codec
    }

    /// Generate the next prime after the largest one known and record it
    ///
    /// Trial division runs over the primes found so far and stops once the
    /// divisor squared exceeds the candidate.
    pub fn next_prime(&mut self) -> Composite {
        let two = Composite::from(2u32);
        let mut candidate = match self.primes.last() {
            None => two.clone(),
            Some(last) if *last == two => Composite::from(3u32),
            Some(last) => last + &two,
        };

        loop {
            let composite = self
                .primes
                .iter()
                .take_while(|p| *p * *p <= candidate)
                .any(|p| candidate.is_multiple_of(p));
            if !composite {
                break;
            }
            candidate += &two;
        }

        self.primes.push(candidate.clone());
        candidate
    }

    /// Prime for `symbol`, assigning a fresh one if the symbol is new
    pub fn intern(&mut self, symbol: &str) -> Composite {
        if let Some(prime) = self.table.get(symbol) {
            return prime.clone();
        }
        let prime = self.next_prime();
        self.table.insert(symbol.to_string(), prime.clone());
        self.symbols.push(symbol.to_string());
        prime
    }

    /// Encode a token sequence as the product of its primes
    ///
    /// The empty sequence encodes to 1.
    pub fn encode<S: AsRef<str>>(&mut self, tokens: &[S]) -> Composite {
        let mut acc = Composite::one();
        for token in tokens {
            acc *= self.intern(token.as_ref());
        }
        acc
    }

    pub fn prime_of(&self, symbol: &str) -> Option<&Composite> {
        self.table.get(symbol)
    }

    /// Interned symbols in the order their primes were assigned
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Factor a composite back into `(symbol, multiplicity)` pairs
    ///
    /// Returns `None` when the composite contains a factor no interned symbol
    /// accounts for. Order of the result follows prime assignment order, not
    /// the order of any original sequence.
    pub fn decode_multiset(&self, composite: &Composite) -> Option<Vec<(Symbol, usize)>> {
        if composite.is_zero() {
            return None;
        }
        let mut rest = composite.clone();
        let mut counts = Vec::new();
        for symbol in &self.symbols {
            let prime = &self.table[symbol];
            let mut count = 0;
            loop {
                let (quotient, remainder) = rest.div_rem(prime);
                if !remainder.is_zero() {
                    break;
                }
                rest = quotient;
                count += 1;
            }
            if count > 0 {
                counts.push((symbol.clone(), count));
            }
        }
        rest.is_one().then_some(counts)
    }
}
