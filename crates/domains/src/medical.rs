//! Treatment after an accident.

use crate::matcher::Entry;

pub fn entries() -> Vec<Entry> {
    vec![
        Entry {
            keywords: &["doctor", "treatment", "see a doctor", "treat", "medical care"],
            category: "treatment",
            content: "Get checked by a doctor as soon as possible after a crash, even if you feel fine. Some \
                      injuries show up days later, and gaps in **treatment** are one of the first things an \
                      insurer points to when it disputes a claim.",
            table: None,
        },
        Entry {
            keywords: &["chiropractor", "chiropractic", "physical therapy", "pt", "therapy"],
            category: "therapy",
            content: "**Chiropractic care and physical therapy** are common for soft tissue injuries like \
                      whiplash. Attend every scheduled visit and tell your provider about all of your symptoms \
                      so your records reflect the full injury.",
            table: None,
        },
        Entry {
            keywords: &["mri", "x ray", "xray", "ct scan", "imaging"],
            category: "imaging",
            content: "**Imaging** such as X-rays, CT scans and MRIs documents injuries that are not visible on \
                      the outside, like herniated discs or fractures. Your doctor decides whether imaging is \
                      needed.",
            table: None,
        },
        Entry {
            keywords: &["medical bills", "health insurance", "who pays my bills", "letter of protection"],
            category: "medical_bills",
            content: "**Medical bills** are usually paid first by PIP or MedPay, then by health insurance. Some \
                      providers will treat under a letter of protection and wait for payment from the \
                      settlement.",
            table: None,
        },
        Entry {
            keywords: &["whiplash", "neck pain", "back pain", "concussion", "soft tissue"],
            category: "injuries",
            content: "Common crash injuries include **whiplash**, back strains, and **concussions**. Symptoms \
                      such as headaches, stiffness, or trouble concentrating should be reported to your doctor \
                      right away.",
            table: None,
        },
    ]
}
