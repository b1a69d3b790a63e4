//! Built-in knowledge for the banks publishing rate sheets in Botswana.

use super::BankProfile;

fn profile(
    id: &str,
    aliases: &[&str],
    display_name: &str,
    website: &str,
    hint_text: &str,
) -> BankProfile {
    BankProfile {
        id: id.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        display_name: display_name.to_string(),
        website: website.to_string(),
        hint_text: hint_text.trim().to_string(),
    }
}

/// Profiles in detection order.
pub(super) fn profiles() -> Vec<BankProfile> {
    vec![
        profile("ABSA", &["absa"], "ABSA Bank Botswana", "https://www.absa.co.bw", ABSA_HINT),
        profile(
            "ACCESS",
            &["access"],
            "Access Bank Botswana",
            "https://botswana.accessbankplc.com",
            ACCESS_HINT,
        ),
        profile(
            "BSB",
            &["bsb", "botswana savings"],
            "Botswana Savings Bank (BSB)",
            "https://www.bsb.bw",
            BSB_HINT,
        ),
        profile("BBS", &["bbs"], "BBS Bank", "https://www.bbs.co.bw", BBS_HINT),
        profile(
            "FNB",
            &["fnb", "first national"],
            "FNB Botswana",
            "https://www.fnbbotswana.co.bw",
            FNB_HINT,
        ),
        profile(
            "STANBIC",
            &["stanbic"],
            "Stanbic Bank Botswana",
            "https://www.stanbicbank.co.bw",
            STANBIC_HINT,
        ),
        profile(
            "STANDARD_CHARTERED",
            &["standard chartered", "sc bank"],
            "Standard Chartered Botswana",
            "https://www.sc.com/bw",
            STANDARD_CHARTERED_HINT,
        ),
        profile(
            "BANK_GABORONE",
            &["bank gaborone", "bankg", "bg bank"],
            "Bank Gaborone",
            "https://www.bankg.co.bw",
            BANK_GABORONE_HINT,
        ),
        profile(
            "BARODA",
            &["baroda", "bank of baroda"],
            "Bank of Baroda Botswana",
            "https://www.bankofbaroda.co.bw",
            BARODA_HINT,
        ),
        profile(
            "FIRST_CAPITAL",
            &["first capital"],
            "First Capital Bank Botswana",
            "https://www.firstcapitalbank.co.bw",
            FIRST_CAPITAL_HINT,
        ),
        profile(
            "BANCABC",
            &["bancabc", "banc abc", "african banking"],
            "BancABC Botswana",
            "https://www.bancabc.co.bw",
            BANCABC_HINT,
        ),
    ]
}

const ABSA_HINT: &str = r#"
ABSA BANK SPECIFIC INSTRUCTIONS:
- PLR: "Absa PLR" = 6.76% (the gap in the rendering may show it as "6. %"; the value is 6.76)
- DEPOSIT TABLE: BWP section only, ignore the ZAR/GBP/USD tables.
  Current: 0.00% - 1.00% nominal
  Call: 0.00% - 0.55% nominal
  Savings: 0.00% - 3.60% nominal / 0.00% - 3.66% effective
  Fixed Deposits: the 5 FD rows below Savings have BLANK first cells; the term labels
  sit above the table, outside the row cells. Map the rows by position:
    FD row 1 = 3 Months:    1.46% nominal, 1.47% effective
    FD row 2 = 6 Months:    1.73%-1.90% nominal, 1.74%-1.91% effective
    FD row 3 = 12 Months:   2.57%-3.07% nominal, 2.57%-3.07% effective
    FD row 4 = 24 Months:   2.92%-3.62% nominal, 2.92%-3.62% effective
    FD row 5 = Over 24M:    3.02%-3.82% nominal, 3.02%-3.82% effective
- LENDING TABLE (final rates use Absa PLR = 6.76):
  MoPR = 3.50%
  Mortgage:      Absa PLR+10.50% to Absa PLR+14%   -> 17.26% to 20.76%
  Overdraft:     Absa PLR+10% to Absa PLR+20%      -> 16.76% to 26.76%
  Credit Card:   24% to 36% (quoted directly, no PLR)
  Lease (VAF):   Absa PLR+11.75% to Absa PLR+14%   -> 18.51% to 20.76%
  Personal Loan: Absa PLR+14.5% to Absa PLR+24%    -> 21.26% to 30.76%
  Other LT:      Negotiable -> null
- Website in footer/header: www.absa.co.bw -> https://www.absa.co.bw
"#;

const ACCESS_HINT: &str = r#"
ACCESS BANK SPECIFIC INSTRUCTIONS:
- PLR: "ABB Prime" or "Access Bank Botswana Prime Lending Rate" = 7.16%
- DEPOSIT: two deposit tables sit side by side. Use ONLY the LEFT (BWP) table and
  ignore the right-hand foreign currency (USD/ZAR/GBP/EUR) table.
  Current: Nil
  Call:        0.10%-0.60% nominal / 0.10%-0.60% effective  (min balance P1,000)
  Savings:     0.15%-5.50% nominal / 0.15%-5.50% effective  (min balance P100)
  91Day:       1.00%-3.50% nominal / 1.00%-3.50% effective  (min balance P1,000), the 91-day FD
  6 Months:    1.76%-4.01% nominal / 1.75%-4.00% effective  (min balance P1,000)
  12 Months:   2.05%-6.25% nominal / 2.05%-6.25% effective  (min balance P1,000)
  24 Months:   2.25%-6.25% nominal / 2.25%-6.25% effective  (min balance P1,000)
  Over 24M:    2.55%-6.25% nominal / 2.55%-6.25% effective  (min balance P1,000)
- LENDING TABLE (final rates use ABB Prime = 7.16):
  MoPR = 3.50%
  Mortgage:      ABB Prime+0.5% to ABB Prime+10%  -> 7.66% to 17.16%
  Overdraft:     ABB Prime+1% to ABB Prime+20%    -> 8.16% to 27.16%
  Credit Card:   Up to 32% (no PLR: 0 as min, 32 as max)
  Lease Loans:   ABB Prime+1% to ABB Prime+10%    -> 8.16% to 17.16%
  Personal Loan: ABB Prime+1% to ABB Prime+25%    -> 8.16% to 32.16%
  Other LT:      Not Available -> null
- Contact phone in the footer: Fairgrounds 367 4600 -> "367 4600"
- The website is not printed on this sheet: use https://botswana.accessbankplc.com
"#;

const BSB_HINT: &str = r#"
BSB (BOTSWANA SAVINGS BANK) SPECIFIC INSTRUCTIONS:
- PLR = 8.01%
- DEPOSIT TABLE: Type | Nominal (Lowest-Highest) | Actual/Effective (Lowest-Highest) | Min Balance (Pula)
  Current: NIL
  Savings has three sub-products; report the overall Savings range:
    "Sesigo":   1.75%-2.75% nominal, 1.76%-2.78% effective  (min P200)
    "Ordinary": 1.75% nominal, 1.76% effective               (min P50)
    "SAYE":     1.25%-2.00% nominal, 1.26%-2.02% effective   (min P200)
  Savings overall: min=1.25, max=2.75 (spanning all sub-products)
  SAYE: SAYE Min=1.25, SAYE Max=2.00, SAYE Effective Min=1.26, SAYE Effective Max=2.02
  Fixed Deposits (all min balance P1,000):
    3 months:    0.80%-1.00% nominal, 0.80%-1.00% effective
    6 months:    1.40%-1.75% nominal, 1.41%-1.76% effective
    12 months:   1.85%-2.20% nominal, 1.87%-2.22% effective
    24 months:   2.25%-2.55% nominal, 2.27%-2.58% effective
    Over 24M:    3.35%-3.80% nominal, 3.40%-3.87% effective
- LENDING TABLE (final rates use Prime = 8.01):
  MoPR = 3.50%
  Mortgage:   "Prime to Prime + 5.00%"  -> min=8.01, max=13.01
  Overdraft:  N/A -> null
  Credit Card: N/A -> null
  Eezi Auto (= CAR LOAN): Prime+3.50% to Prime+8.0% -> 11.51% to 16.01%
  Lease Loans: N/A -> null
  Personal Loan: Prime+12% to Prime+22% -> 20.01% to 30.01%
  Other LT: N/A -> null
- Contact phone in the footer: "36 7 0100" or "367 0100" -> "367 0100"
- Website in footer: www.bsb.bw -> https://www.bsb.bw
"#;

const BBS_HINT: &str = r#"
BBS BANK SPECIFIC INSTRUCTIONS:
- This is an IMAGE-BASED document: all content is drawn as graphics.
- Scan the whole image for a rate schedule table with product names in one column
  and interest rate percentages in the others.
- Check every area of the image: header, body, footer, watermarks, small print.
- Extract every rate value that is visible.
- Report period: 01 December 2025
- Website: www.bbs.co.bw -> https://www.bbs.co.bw
"#;

const FNB_HINT: &str = r#"
FNB BOTSWANA SPECIFIC INSTRUCTIONS:
- FNB = First National Bank Botswana
- Products: Cheque/Current, Smart Savings, Gold Account, Fixed Deposits, e-Savings
- Lending: Home Loans (mortgage), Personal Loans, Overdraft
- Calculate all PLR+ lending rates to final values using their PLR
- Website anywhere in the document: fnbbotswana.co.bw -> https://www.fnbbotswana.co.bw
"#;

const STANBIC_HINT: &str = r#"
STANBIC BANK BOTSWANA SPECIFIC INSTRUCTIONS:
- Standard Bank Group subsidiary in Botswana
- Products: PureSave, AccessAccount, BizFlex, Fixed Deposits
- Calculate all PLR+ lending rates to final values
- Website: stanbicbank.co.bw -> https://www.stanbicbank.co.bw
"#;

const STANDARD_CHARTERED_HINT: &str = r#"
STANDARD CHARTERED BOTSWANA SPECIFIC INSTRUCTIONS:
- Products: e$aver, Bonus$aver, Fixed Deposits
- Calculate all PLR+ lending rates to final values
- Website: sc.com/bw -> https://www.sc.com/bw
"#;

const BANK_GABORONE_HINT: &str = r#"
BANK GABORONE SPECIFIC INSTRUCTIONS:
- Local Botswana bank
- Calculate all PLR+ lending rates to final values
- Website: bankg.co.bw -> https://www.bankg.co.bw
"#;

const BARODA_HINT: &str = r#"
BANK OF BARODA BOTSWANA SPECIFIC INSTRUCTIONS:
- Indian bank with Botswana operations
- Calculate all PLR+ lending rates to final values
- Website: bankofbaroda.co.bw
"#;

const FIRST_CAPITAL_HINT: &str = r#"
FIRST CAPITAL BANK BOTSWANA SPECIFIC INSTRUCTIONS:
- Calculate all PLR+ lending rates to final values
- Website: firstcapitalbank.co.bw
"#;

const BANCABC_HINT: &str = r#"
BANCABC BOTSWANA SPECIFIC INSTRUCTIONS:
- African Banking Corporation Botswana
- Calculate all PLR+ lending rates to final values
- Website: bancabc.co.bw -> https://www.bancabc.co.bw
"#;
