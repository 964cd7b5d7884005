// src/common/card_code.rs

use rand::Rng;

// Alfabeto sem caracteres ambíguos (0/O, 1/I/L) para o código impresso no
// cartão do cliente.
const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

pub const CODE_LEN: usize = 8;

/// Gera um código de cartão aleatório de 8 caracteres.
///
/// A unicidade é garantida pela constraint UNIQUE no banco; em caso de
/// colisão o chamador gera um novo código e tenta de novo.
pub fn generate_card_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_card_code_formato() {
        let code = generate_card_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_card_code_varia() {
        // Teoricamente podem colidir, mas a chance é desprezível; o objetivo
        // é garantir que o gerador não está preso em um único valor.
        let codes: std::collections::HashSet<String> =
            (0..32).map(|_| generate_card_code()).collect();
        assert!(codes.len() > 1);
    }
}
