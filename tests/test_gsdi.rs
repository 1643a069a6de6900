use gsdi::model::{Event, Identifier, PhyloTree, Taxonomy};
use gsdi::newick::{LeafTaxonomy, NewickParser, parse_str};
use gsdi::parser::ByteParser;
use gsdi::reconcile;
use gsdi::sdi::{
    Gsdi, GsdiConfig, SdiError, TaxonomyComparisonBase, TreeRole, UnmatchedReason,
};

fn species_hominids() -> PhyloTree {
    parse_str("((Human,Chimp),Gorilla);").unwrap()
}

fn parse_with(newick: &str, leaf_taxonomy: LeafTaxonomy) -> PhyloTree {
    NewickParser::new()
        .with_taxonomy_from(leaf_taxonomy)
        .parse_str(&mut ByteParser::for_str(newick))
        .unwrap()
}

fn assert_total(gene_tree: &PhyloTree) {
    for vertex in gene_tree.pre_order_iter() {
        assert!(vertex.link().is_some(), "vertex {} has no link", vertex.index());
        assert_eq!(vertex.is_internal(), vertex.event().is_some());
    }
}

// ============= Scenarios =============
#[test]
fn test_speciation_without_cost() {
    let mut species = species_hominids();
    let mut gene = parse_str("(Human,Chimp);").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert_eq!(gene.root().event(), Some(Event::Speciation));
    assert_eq!(result.speciations(), 1);
    assert_eq!(result.duplications(), 0);
    assert_eq!(result.mapping_cost(), 0);
    assert_eq!(result.comparison_base(), TaxonomyComparisonBase::ScientificName);

    let human_chimp = species[species.leaf_by_name("Human").unwrap()].parent();
    assert_eq!(gene.root().link(), human_chimp);
}

#[test]
fn test_duplicated_human_gene() {
    let mut species = species_hominids();
    let mut gene = parse_str("((Human,Human),Chimp);").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    let inner = gene.root().children()[0];
    assert_eq!(gene[inner].event(), Some(Event::Duplication));
    assert_eq!(gene[inner].link(), species.leaf_by_name("Human"));
    assert_eq!(gene.root().event(), Some(Event::Speciation));
    assert_eq!(result.duplications(), 1);
    assert_eq!(result.speciations(), 1);
    assert_eq!(result.speciation_or_duplications(), 0);
    assert_total(&gene);
}

#[test]
fn test_polytomy_is_ambiguous() {
    let mut species = parse_str("(A,B,C);").unwrap();
    let mut gene = parse_str("((A,B),C);").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    let inner = gene.root().children()[0];
    assert_eq!(gene[inner].event(), Some(Event::Speciation));
    assert_eq!(gene.root().event(), Some(Event::SpeciationOrDuplication));
    assert_eq!(result.speciation_or_duplications(), 1);
    assert_eq!(result.speciations(), 1);
    assert_eq!(result.duplications(), 0);
}

#[test]
fn test_polytomy_most_parsimonious() {
    let mut species = parse_str("(A,B,C);").unwrap();
    let mut gene = parse_str("((A,B),C);").unwrap();

    let result = reconcile(&mut gene, &mut species, true, false, false).unwrap();

    assert_eq!(gene.root().event(), Some(Event::Speciation));
    assert_eq!(result.speciations(), 2);
    assert_eq!(result.speciation_or_duplications(), 0);
    assert!(result.most_parsimonious());
}

#[test]
fn test_same_species_leaves_force_duplication() {
    let mut species = parse_str("((A,B),(C,D));").unwrap();
    let mut gene = parse_str("(((A,A),(B,B)),(C,(D,D)));").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    for vertex in gene.pre_order_iter().filter(|v| v.is_internal()) {
        let children = vertex.children();
        if children.iter().all(|&c| gene[c].is_leaf())
            && gene[children[0]].name() == gene[children[1]].name()
        {
            assert_eq!(vertex.event(), Some(Event::Duplication));
        }
    }
    assert_eq!(result.duplications(), 3);
    assert_eq!(result.num_internal_events(), gene.num_internal());
}

#[test]
fn test_duplication_above_mapped_vertex() {
    let mut species = parse_str("((A,B),C);").unwrap();
    let mut gene = parse_str("((A,B),A);").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    let inner = gene.root().children()[0];
    assert_eq!(gene[inner].event(), Some(Event::Speciation));
    assert_eq!(gene.root().event(), Some(Event::Duplication));
    assert_eq!(gene.root().link(), gene[inner].link());
    // B lost in the second copy
    assert_eq!(result.mapping_cost(), 1);
    assert_eq!(result.ascent_steps(), 3);
}

#[test]
fn test_mapping_cost_counts_skipped_lineages() {
    let mut species = parse_str("(((A,B),C),D);").unwrap();
    let mut gene = parse_str("(A,D);").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert_eq!(gene.root().event(), Some(Event::Speciation));
    assert_eq!(gene.root().link(), species.root_index());
    // B and C lineages lost
    assert_eq!(result.mapping_cost(), 2);
    assert_eq!(result.ascent_steps(), 4);
}

#[test]
fn test_mapping_cost_excludes_duplications() {
    let mut species = parse_str("(A,B);").unwrap();
    let mut gene = parse_str("((A,B),(A,B));").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert_eq!(gene.root().event(), Some(Event::Duplication));
    assert_eq!(result.duplications(), 1);
    // No lineage lost, the duplication itself is not counted
    assert_eq!(result.mapping_cost(), 0);
    assert_eq!(result.mapping_cost() + result.duplications(), 1);
}

#[test]
fn test_isomorphic_gene_tree_has_only_speciations() {
    let newick = "(((A,B),(C,D,E)),(F,G));";
    let mut species = parse_str(newick).unwrap();
    let mut gene = parse_str(newick).unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert_eq!(result.duplications(), 0);
    assert_eq!(result.speciation_or_duplications(), 0);
    assert_eq!(result.speciations(), gene.num_internal());
    assert_eq!(result.mapping_cost(), 0);
}

// ============= Stripping =============
/// ((A,B),x) where x carries no taxonomy
fn gene_with_unknown_leaf() -> PhyloTree {
    let mut gene = PhyloTree::new();
    let a = gene.add_species_leaf("A");
    let b = gene.add_species_leaf("B");
    let x = gene.add_leaf(Some("x".into()), None, None);
    let ab = gene.add_internal_vertex(vec![a, b], None);
    gene.add_root(vec![ab, x]);
    gene
}

#[test]
fn test_strip_gene_leaf_without_taxonomy() {
    let mut species = parse_str("((A,B),C);").unwrap();
    let mut gene = gene_with_unknown_leaf();

    let result = reconcile(&mut gene, &mut species, false, true, false).unwrap();

    assert_eq!(result.stripped_gene_leaves(), &[2]);
    assert!(gene[2].is_removed());
    assert_eq!(gene.num_leaves(), 2);
    assert_eq!(gene.root_index(), Some(3));
    assert_eq!(result.speciations(), 1);
    assert!(gene.is_valid());
}

#[test]
fn test_unmatched_gene_leaf_fails_without_stripping() {
    let mut species = parse_str("((A,B),C);").unwrap();
    let mut gene = gene_with_unknown_leaf();

    let err = reconcile(&mut gene, &mut species, false, false, false).unwrap_err();

    assert_eq!(
        err,
        SdiError::UnmatchedGeneLeaf {
            node: 2,
            name: Some("x".to_string()),
            reason: UnmatchedReason::NoTaxonomy,
        }
    );
    assert!(err.to_string().contains("\"x\""));
}

#[test]
fn test_gene_leaf_missing_from_species_tree() {
    let mut species = parse_str("((A,B),C);").unwrap();
    let mut gene = parse_str("((A,D),C);").unwrap();

    let err = reconcile(&mut gene, &mut species, false, false, false).unwrap_err();
    match err {
        SdiError::UnmatchedGeneLeaf { name, reason, .. } => {
            assert_eq!(name.as_deref(), Some("D"));
            assert_eq!(reason, UnmatchedReason::NotInSpeciesTree("D".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }

    let result = reconcile(&mut gene, &mut species, false, true, false).unwrap();
    assert_eq!(result.stripped_gene_leaves().len(), 1);
    assert_eq!(gene.num_leaves(), 2);
    assert_total(&gene);
}

#[test]
fn test_gene_leaf_without_comparison_field() {
    let mut species = parse_with("((HUMAN,MOUSE),CHICK);", LeafTaxonomy::Code);
    let mut gene = PhyloTree::new();
    let a = gene.add_leaf(None, Some(Taxonomy::from_code("HUMAN")), None);
    let b = gene.add_leaf(None, Some(Taxonomy::from_code("MOUSE")), None);
    let c = gene.add_leaf(None, Some(Taxonomy::from_scientific_name("Gallus gallus")), None);
    gene.add_root(vec![a, b, c]);

    let err = reconcile(&mut gene, &mut species, false, false, false).unwrap_err();
    assert!(matches!(
        err,
        SdiError::UnmatchedGeneLeaf {
            reason: UnmatchedReason::NoKey(TaxonomyComparisonBase::Code),
            ..
        }
    ));
}

#[test]
fn test_strip_species_tree() {
    let mut species = parse_str("((A,B),(C,D));").unwrap();
    let mut gene = parse_str("(A,B);").unwrap();
    let c = species.leaf_by_name("C").unwrap();
    let d = species.leaf_by_name("D").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, true).unwrap();

    assert_eq!(result.stripped_species_leaves(), &[c, d]);
    assert_eq!(species.num_leaves(), 2);
    assert!(species.is_valid());
    assert_eq!(gene.root().link(), species.root_index());
    let mapped: Vec<_> = result.mapped_species_leaves().iter().copied().collect();
    assert_eq!(mapped, species.leaves());
}

#[test]
fn test_species_tree_untouched_without_stripping() {
    let mut species = parse_str("((A,B),(C,D));").unwrap();
    let mut gene = parse_str("(A,B);").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert!(result.stripped_species_leaves().is_empty());
    assert_eq!(species.num_leaves(), 4);
    assert_eq!(result.mapped_species_leaves().len(), 2);
}

// ============= Matching =============
#[test]
fn test_match_on_code_suffix() {
    let mut species = parse_with("((HUMAN,PANTR),MOUSE);", LeafTaxonomy::Code);
    let mut gene = parse_with(
        "((BRCA1_HUMAN,BRCA1_PANTR),(BRCA1_MOUSE,BRCA2_MOUSE));",
        LeafTaxonomy::CodeSuffix,
    );

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert_eq!(result.comparison_base(), TaxonomyComparisonBase::Code);
    assert_eq!(result.duplications(), 1);
    let mouse = species.leaf_by_name("MOUSE").unwrap();
    let mouse_pair = gene.root().children()[1];
    assert_eq!(gene[mouse_pair].link(), Some(mouse));
}

#[test]
fn test_match_on_identifier_with_provider() {
    let taxon = |id: &str| Some(Taxonomy::from_identifier(Identifier::with_provider(id, "ncbi")));

    let mut species = PhyloTree::new();
    let human = species.add_leaf(Some("human".into()), taxon("9606"), None);
    let mouse = species.add_leaf(Some("mouse".into()), taxon("10090"), None);
    species.add_root(vec![human, mouse]);

    let mut gene = PhyloTree::new();
    let a = gene.add_leaf(None, taxon("10090"), None);
    let b = gene.add_leaf(None, taxon("9606"), None);
    gene.add_root(vec![a, b]);

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert_eq!(result.comparison_base(), TaxonomyComparisonBase::Identifier);
    assert_eq!(gene[a].link(), Some(mouse));
    assert_eq!(gene[b].link(), Some(human));
    assert_eq!(gene.root().event(), Some(Event::Speciation));
}

// ============= Errors =============
#[test]
fn test_duplicate_species_taxonomy() {
    let mut species = parse_str("((A,B),A);").unwrap();
    let mut gene = parse_str("(A,B);").unwrap();

    let err = reconcile(&mut gene, &mut species, false, false, false).unwrap_err();
    assert_eq!(err, SdiError::DuplicateSpeciesTaxonomy { key: "A".to_string() });
}

#[test]
fn test_insufficient_taxonomic_data() {
    let mut species = parse_str("((A,B),C);").unwrap();
    let mut gene = parse_with("((a[&&NHX:S=A],b),c);", LeafTaxonomy::None);

    let err = reconcile(&mut gene, &mut species, false, true, true).unwrap_err();
    assert_eq!(err, SdiError::InsufficientTaxonomicData { count: 1 });
    // Nothing was stripped
    assert_eq!(gene.num_leaves(), 3);
    assert_eq!(species.num_leaves(), 3);
}

#[test]
fn test_empty_trees() {
    let mut gene = parse_str("(A,B);").unwrap();
    let mut empty = PhyloTree::new();
    assert_eq!(
        reconcile(&mut gene, &mut empty, false, false, false).unwrap_err(),
        SdiError::EmptyTree(TreeRole::Species)
    );
    assert_eq!(
        reconcile(&mut empty, &mut gene, false, false, false).unwrap_err(),
        SdiError::EmptyTree(TreeRole::Gene)
    );
}

#[test]
fn test_all_gene_leaves_stripped() {
    let mut species = parse_str("(A,B);").unwrap();
    let mut gene = parse_str("(D,E);").unwrap();

    let err = reconcile(&mut gene, &mut species, false, true, false).unwrap_err();
    assert_eq!(err, SdiError::EmptyTree(TreeRole::Gene));
}

// ============= Runs =============
#[test]
fn test_rerun_is_idempotent() {
    let gsdi = Gsdi::new(GsdiConfig::default());
    let mut species = parse_str("((A,B,C),(D,E));").unwrap();
    let mut gene = parse_str("(((A,C),(B,B)),((D,E),(A,E)));").unwrap();

    let first = gsdi.infer(&mut gene, &mut species).unwrap();
    let first_events: Vec<_> = gene.pre_order_iter().map(|v| (v.link(), v.event())).collect();
    let second = gsdi.infer(&mut gene, &mut species).unwrap();
    let second_events: Vec<_> = gene.pre_order_iter().map(|v| (v.link(), v.event())).collect();

    assert_eq!(first, second);
    assert_eq!(first_events, second_events);
    assert_total(&gene);
}

#[test]
fn test_previous_annotations_are_replaced() {
    let mut species = species_hominids();
    let mut gene = parse_str("((Human,Chimp)[&&NHX:D=Y],Gorilla)[&&NHX:D=Y];").unwrap();

    let result = reconcile(&mut gene, &mut species, false, false, false).unwrap();

    assert_eq!(result.duplications(), 0);
    assert!(gene.pre_order_iter().filter(|v| v.is_internal()).all(|v| v.event() == Some(Event::Speciation)));
}

#[test]
fn test_single_leaf_gene_tree_after_stripping() {
    let mut species = parse_str("(A,B);").unwrap();
    let mut gene = parse_str("(A,(D,E));").unwrap();

    let result = reconcile(&mut gene, &mut species, false, true, false).unwrap();

    assert_eq!(result.num_internal_events(), 0);
    assert!(gene.root().is_leaf());
    assert_eq!(gene.root().link(), species.leaf_by_name("A"));
}

#[test]
fn test_config_and_reconcile_agree() {
    let config = GsdiConfig::new()
        .with_most_parsimonious(true)
        .with_strip_gene_tree(true)
        .with_strip_species_tree(true);
    assert_eq!(Gsdi::new(config).config(), &config);

    let mut species_1 = parse_str("((A,B,C),D);").unwrap();
    let mut gene_1 = parse_str("((A,(B,X)),(C,D));").unwrap();
    let mut species_2 = species_1.clone();
    let mut gene_2 = gene_1.clone();

    let via_config = Gsdi::new(config).infer(&mut gene_1, &mut species_1).unwrap();
    let via_reconcile = reconcile(&mut gene_2, &mut species_2, true, true, true).unwrap();
    assert_eq!(via_config, via_reconcile);
}

#[test]
fn test_summary() {
    let mut species = species_hominids();
    let mut gene = parse_str("((Human,Human),Chimp);").unwrap();

    let summary = reconcile(&mut gene, &mut species, false, false, false)
        .unwrap()
        .to_string();
    assert!(summary.contains("Most parsimonious duplication model: false"));
    assert!(summary.contains("Speciations sum                    : 1"));
    assert!(summary.contains("Duplications sum                   : 1"));
    assert!(summary.contains("Speciation or duplications sum     : 0"));
    assert!(summary.contains("Mapping cost                       : 0"));

    let mut gene = parse_str("((Human,Human),Chimp);").unwrap();
    let summary = reconcile(&mut gene, &mut species, true, false, false)
        .unwrap()
        .to_string();
    assert!(!summary.contains("Speciation or duplications"));
}
