//! Auto insurance coverage terms.

use crate::matcher::Entry;

const COVERAGE_TABLE: &str = "\
| Coverage | Pays for | Who it protects |
|----------|----------|-----------------|
| Liability | Other driver's injuries and property | The at-fault driver |
| PIP | Your medical bills and lost wages | You and your passengers |
| UM | Your losses when the other driver has no insurance | You |
| UIM | The gap when the other driver's limits are too low | You |
| MedPay | Medical bills regardless of fault | You and your passengers |";

pub fn entries() -> Vec<Entry> {
    vec![
        Entry {
            keywords: &["um", "uninsured", "uninsured motorist", "no insurance"],
            category: "uninsured_motorist",
            content: "**Uninsured Motorist (UM) coverage** protects you when the driver who hit you has no \
                      insurance at all, or in a hit-and-run. It steps in where the at-fault driver's liability \
                      policy would have paid: medical bills, lost wages, and pain and suffering. UM is part of \
                      your own policy, so the claim is made against your insurer.",
            table: Some(COVERAGE_TABLE),
        },
        Entry {
            keywords: &["uim", "underinsured", "underinsured motorist", "not enough insurance", "stacking"],
            category: "underinsured_motorist",
            content: "**Underinsured Motorist (UIM) coverage** applies when the at-fault driver has insurance \
                      but their limits are too low to cover your damages. After their policy pays its limit, \
                      your UIM coverage can pay the difference up to your own UIM limit. Some states let you \
                      stack UIM limits across vehicles on the same policy.",
            table: Some(COVERAGE_TABLE),
        },
        Entry {
            keywords: &["pip", "personal injury protection", "no fault"],
            category: "pip",
            content: "**Personal Injury Protection (PIP)** pays your medical bills and a portion of lost wages \
                      after a crash no matter who caused it. PIP claims go to your own insurer and are usually \
                      paid first, before any claim against the other driver.",
            table: None,
        },
        Entry {
            keywords: &["medpay", "med pay", "medical payments"],
            category: "medpay",
            content: "**Medical Payments (MedPay) coverage** reimburses medical expenses for you and your \
                      passengers regardless of fault. It is usually a smaller benefit than PIP and does not \
                      cover lost wages.",
            table: None,
        },
        Entry {
            keywords: &["liability", "bodily injury", "policy limits", "limits", "at fault"],
            category: "liability",
            content: "**Liability coverage** is the at-fault driver's insurance. Bodily injury liability pays \
                      for the injured person's damages up to the policy limits, and property damage liability \
                      pays for vehicle repairs. Policy limits are usually written like 30/60/25: per person, \
                      per accident, and property damage, in thousands of dollars.",
            table: Some(COVERAGE_TABLE),
        },
        Entry {
            keywords: &["adjuster", "claim number", "recorded statement", "insurance company", "insurer"],
            category: "adjuster",
            content: "The **insurance adjuster** evaluates the claim for the insurance company. Once you have a \
                      lawyer, the adjuster should contact the firm rather than you. Avoid giving a recorded \
                      statement to the other driver's insurer without talking to your attorney first.",
            table: None,
        },
        Entry {
            keywords: &["property damage", "rental", "total loss", "diminished value", "repair"],
            category: "property_damage",
            content: "**Property damage** claims cover repairs to your vehicle, or its actual cash value if it \
                      is a total loss. You may also be owed a rental car while it is repaired and, in some \
                      states, diminished value for the drop in resale price.",
            table: None,
        },
    ]
}
