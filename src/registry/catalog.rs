use super::WalletMapping;

pub const DUO_DEBT_WALLET: &str = "DUO Schuld";
pub const WBW_SISTER: &str = "WBW (Broertje en Zusjelief)";
pub const WBW_FRIENDS: &str = "WBW (The Ridiculous Seven)";
pub const WBW_DISPUUT: &str = "WBW (Alea Iacta Est)";
pub const CASH_WALLET: &str = "Cash";
pub const ING_WALLET: &str = "ING";
pub const KOOPZEGEL_WALLET: &str = "Koopzegel";
pub const REVOLUT_WALLET: &str = "Revolut";
pub const ASN_WALLET: &str = "ASN";
pub const FIXED_CHARGES_WALLET: &str = "ASN Vaste lasten";
pub const EXPECTED_TAXES_WALLET: &str = "Expected taxes";
pub const DEBIT_WALLET: &str = "Debit";
pub const DUO_INVEST_WALLET: &str = "ASN Beleggen (DUO)";
pub const SPLIT_WALLET: &str = "Uitsplitsen";
pub const INVEST_WALLET: &str = "ASN Beleggen (Persoonlijk)";
pub const CRYPTO_WALLET: &str = "Crypto";
pub const SAVINGS_WALLET: &str = "ASN Spaarrekening";

/// Built-in wallets and the environment variable holding each one's initial balance.
pub const WALLETS: &[(&str, &str)] = &[
    (DUO_DEBT_WALLET, "DUO_DEBT_WALLET"),
    (WBW_SISTER, "WBW_SISTER"),
    (WBW_FRIENDS, "WBW_FRIENDS"),
    (WBW_DISPUUT, "WBW_DISPUUT"),
    (CASH_WALLET, "CASH_WALLET"),
    (ING_WALLET, "ING_WALLET"),
    (KOOPZEGEL_WALLET, "KOOPZEGEL_WALLET"),
    (REVOLUT_WALLET, "REVOLUT_WALLET"),
    (ASN_WALLET, "ASN_WALLET"),
    (FIXED_CHARGES_WALLET, "FIXED_CHARGES_WALLET"),
    (EXPECTED_TAXES_WALLET, "EXPECTED_TAXES_WALLET"),
    (DEBIT_WALLET, "DEBIT_WALLET"),
    (DUO_INVEST_WALLET, "DUO_INVEST_WALLET"),
    (SPLIT_WALLET, "SPLIT_WALLET"),
    (INVEST_WALLET, "INVEST_WALLET"),
    (CRYPTO_WALLET, "CRYPTO_WALLET"),
    (SAVINGS_WALLET, "SAVINGS_WALLET"),
];

pub fn wallet_mapping() -> WalletMapping {
    [
        (SAVINGS_WALLET, vec![ING_WALLET]),
        (DUO_DEBT_WALLET, vec![DUO_INVEST_WALLET]),
        (
            DEBIT_WALLET,
            vec![WBW_SISTER, WBW_FRIENDS, WBW_DISPUUT, KOOPZEGEL_WALLET],
        ),
        (
            ASN_WALLET,
            vec![
                CASH_WALLET,
                SPLIT_WALLET,
                REVOLUT_WALLET,
                FIXED_CHARGES_WALLET,
                EXPECTED_TAXES_WALLET,
            ],
        ),
    ]
    .into_iter()
    .collect()
}
