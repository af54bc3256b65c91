//! How settlements are valued and paid out.

use crate::matcher::Entry;

const DISBURSEMENT_TABLE: &str = "\
| Step | What happens |
|------|--------------|
| 1 | Settlement check is deposited in the firm's trust account |
| 2 | Attorney fees and case costs are deducted |
| 3 | Medical liens and outstanding bills are paid |
| 4 | The remaining balance is paid to you |";

pub fn entries() -> Vec<Entry> {
    vec![
        Entry {
            keywords: &["settlement", "settle", "offer", "how much is my case worth", "case value", "worth"],
            category: "settlement_value",
            content: "A **settlement** is an agreement to resolve the claim for a set amount. Case value depends \
                      on medical bills, lost wages, the severity and duration of your injuries, the available \
                      insurance limits, and how clearly the other driver was at fault.",
            table: None,
        },
        Entry {
            keywords: &["disbursement", "settlement check", "when do i get paid", "payout", "get my money"],
            category: "disbursement",
            content: "After you sign the release, the insurer sends the **settlement check** to the firm. Funds \
                      clear the trust account, liens and fees are paid, and you receive the balance with a \
                      written settlement statement showing every deduction.",
            table: Some(DISBURSEMENT_TABLE),
        },
        Entry {
            keywords: &["release", "sign release", "release form"],
            category: "release",
            content: "The **release** is the document you sign to accept the settlement. It ends your claim \
                      against the released parties for good, so your attorney reviews it before you sign.",
            table: None,
        },
        Entry {
            keywords: &["pain and suffering", "non economic", "damages"],
            category: "damages",
            content: "**Damages** are split into economic losses you can add up, like medical bills and lost \
                      wages, and non-economic losses like pain and suffering, loss of enjoyment of life, and \
                      emotional distress.",
            table: None,
        },
        Entry {
            keywords: &["attorney fee", "attorney fees", "contingency", "contingency fee", "how much do you charge"],
            category: "fees",
            content: "The firm works on a **contingency fee**: no fee unless we recover money for you. The fee is \
                      a percentage of the recovery, set out in your fee agreement, and case costs are \
                      reimbursed from the settlement.",
            table: Some(DISBURSEMENT_TABLE),
        },
    ]
}
