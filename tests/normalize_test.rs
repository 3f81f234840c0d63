//! Normalization of realistic pasted content.

use plume::normalize;

#[test]
fn test_office_paste_becomes_paragraphs() {
    let pasted = concat!(
        r#"<div class="MsoNormal"><span style="font-family:Arial">Premier paragraphe</span></div>"#,
        "<div><br></div>",
        "<div>Second <b>gras</b></div>",
    );
    assert_eq!(
        normalize(pasted),
        "<p>Premier paragraphe</p><p>Second <b>gras</b></p>"
    );
}

#[test]
fn test_link_attributes_survive() {
    let html = concat!(
        r#"<p>Voir <a href="https://exemple.fr" target="_blank" rel="noopener noreferrer" "#,
        r#"data-link-type="external" style="color: #1a0dab">le site</a></p>"#,
    );
    assert_eq!(
        normalize(html),
        r#"Voir <a href="https://exemple.fr" target="_blank" rel="noopener noreferrer" data-link-type="external">le site</a>"#
    );
}

#[test]
fn test_editor_output_is_cleaned() {
    // What the editing surface produces after a heading toggle and a list
    let html = concat!(
        r#"<h2 style="font-size: 1.5em; font-weight: bold">Titre</h2>"#,
        r#"<ul style="list-style-type: disc"><li>un</li><li>deux</li></ul>"#,
        "<p>fin</p>",
    );
    assert_eq!(
        normalize(html),
        "<h2>Titre</h2><ul><li>un</li><li>deux</li></ul><p>fin</p>"
    );
}

#[test]
fn test_normalize_is_idempotent() {
    for html in [
        "<div>a</div><div>b</div>",
        "<h2>Titre</h2><p>Corps</p>",
        r#"<p>du <em>texte</em> <a href="/x">lien</a></p>"#,
        "<table><tr><td>cellule</td></tr></table><p>après</p>",
    ] {
        let once = normalize(html);
        assert_eq!(normalize(&once), once, "input: {html}");
    }
}

#[test]
fn test_nothing_usable() {
    assert_eq!(normalize("<style>p { color: red }</style><!-- vide -->"), "");
    assert_eq!(normalize("<img src=a.png><br><br>"), "");
}
