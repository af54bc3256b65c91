//! Steps of a personal injury case.

use crate::matcher::Entry;

pub fn entries() -> Vec<Entry> {
    vec![
        Entry {
            keywords: &["lor", "letter of representation", "representation letter"],
            category: "letter_of_representation",
            content: "A **Letter of Representation (LOR)** is sent by your attorney to every insurance company \
                      involved in the claim. It tells them the firm represents you and that all communication \
                      must go through the firm. It also asks them to preserve evidence and disclose policy \
                      limits.",
            table: None,
        },
        Entry {
            keywords: &["statute of limitations", "sol", "deadline", "time limit", "how long do i have"],
            category: "statute_of_limitations",
            content: "The **statute of limitations** is the deadline to file a lawsuit. For most car accident \
                      injury claims it is two years from the date of the crash, though it varies by state and \
                      some claims against government entities require notice much sooner. Missing it usually \
                      ends the claim.",
            table: None,
        },
        Entry {
            keywords: &["demand", "demand letter", "demand package"],
            category: "demand",
            content: "A **demand package** is sent to the insurer once treatment is complete. It includes your \
                      medical records and bills, proof of lost wages, and a written account of how the injuries \
                      affected your life, and it states the amount needed to settle.",
            table: None,
        },
        Entry {
            keywords: &["lawsuit", "litigation", "file suit", "petition", "complaint"],
            category: "litigation",
            content: "If the insurer will not make a fair offer, your attorney may **file a lawsuit**. Filing \
                      starts litigation: discovery, depositions, mediation, and, if the case does not settle, \
                      trial. Most cases still settle before trial.",
            table: None,
        },
        Entry {
            keywords: &["deposition", "discovery", "interrogatories"],
            category: "discovery",
            content: "**Discovery** is the exchange of information after a lawsuit is filed. It includes written \
                      questions (interrogatories), document requests, and **depositions**, where witnesses \
                      answer questions under oath with a court reporter present.",
            table: None,
        },
        Entry {
            keywords: &["mediation", "mediator"],
            category: "mediation",
            content: "**Mediation** is a settlement meeting led by a neutral mediator. Both sides present their \
                      positions and the mediator helps them negotiate. Nothing is decided unless both sides \
                      agree.",
            table: None,
        },
        Entry {
            keywords: &["lien", "liens", "subrogation"],
            category: "lien",
            content: "A **lien** is a claim against your settlement by someone who paid for your care, such as \
                      a hospital, health insurer, or Medicare. Liens must be resolved before settlement funds \
                      are disbursed, and they can often be negotiated down.",
            table: None,
        },
    ]
}
